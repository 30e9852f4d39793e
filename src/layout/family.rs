use crate::config::LayoutConfig;

use super::path::smooth_step_path;
use super::types::{InnerFamilyEdge, RoutedEdge, TreeLayout};

/// Routes one parent-to-child connection. The source anchor leaves the
/// parent's bottom edge, shifted left by one `family_edge_x_gap` per earlier
/// sibling group sharing the same source, so branches to different families
/// leave the parent through distinct vertical channels. The horizontal rail
/// runs at `target_y - offset_y`; a collapsed target lifts it by half a
/// standard node height so the path still meets the shrunken placeholder
/// cleanly. Returns `None` when either endpoint is missing.
pub fn route_family_edge(
    edge: &InnerFamilyEdge,
    layout: &TreeLayout,
    config: &LayoutConfig,
) -> Option<RoutedEdge> {
    let source = layout.nodes.get(&edge.source)?;
    let target = layout.nodes.get(&edge.target)?;

    // Same-source edges, deduplicated by family (order-preserving): a parent
    // with several children in one family counts that family once.
    let mut families: Vec<usize> = Vec::new();
    for other in layout.family_edges.iter().filter(|other| other.source == edge.source) {
        if !families.contains(&other.family_index) {
            families.push(other.family_index);
        }
    }
    let ordinal = families.iter().position(|index| *index == edge.family_index)?;

    let source_x = source.x + source.width / 2.0 - ordinal as f32 * config.family_edge_x_gap;
    let source_y = source.y + source.height;
    let target_x = target.x + target.width / 2.0;
    let target_y = target.y;

    let hidden_offset = if target.hidden {
        config.node_height / 2.0
    } else {
        0.0
    };
    let center_y = target_y - edge.offset_y - hidden_offset;

    Some(smooth_step_path(
        source_x,
        source_y,
        target_x,
        target_y,
        center_y,
        config.corner_radius,
    ))
}
