#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod diagram;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use diagram::{FamilyDiagram, node_color_for_minimap};
pub use ir::build_family_and_relations;
pub use layout::{compute_layout, route_couple_edge, route_family_edge};
pub use parser::parse_family;
pub use render::render_svg;
pub use theme::Theme;
