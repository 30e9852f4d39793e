use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{PositionedNode, TreeLayout, route_couple_edge, route_family_edge};
use crate::text_metrics;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const TITLE_BAND_HEIGHT: f32 = 22.0;
const CARD_RADIUS: f32 = 8.0;
const PLACEHOLDER_RADIUS: f32 = 6.0;
const PROFILE_RADIUS: f32 = 14.0;
const CHIP_HEIGHT: f32 = 14.0;
const CARD_PAD: f32 = 10.0;

pub fn render_svg(layout: &TreeLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    // Edges go under the nodes. A router returning nothing (missing or
    // hidden-away endpoint) simply leaves that edge undrawn.
    for edge in &layout.couple_edges {
        if let Some(routed) = route_couple_edge(edge, layout, config) {
            svg.push_str(&format!(
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\"/>",
                routed.path, theme.line_color
            ));
        }
    }
    for edge in &layout.family_edges {
        if let Some(routed) = route_family_edge(edge, layout, config) {
            svg.push_str(&format!(
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\"/>",
                routed.path, theme.line_color
            ));
        }
    }

    for node in layout.nodes.values() {
        if node.hidden {
            svg.push_str(&placeholder_svg(node, theme));
        } else {
            svg.push_str(&card_svg(node, theme));
        }
    }

    svg.push_str("</svg>");
    svg
}

/// The collapsed form: a small square with an expand affordance and the
/// member's title revealed on hover.
fn placeholder_svg(node: &PositionedNode, theme: &Theme) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<g><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{PLACEHOLDER_RADIUS}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.2\">",
        node.x, node.y, node.width, node.height, theme.placeholder_fill, theme.placeholder_border
    ));
    out.push_str(&format!("<title>{}</title>", escape_xml(&node.title)));
    out.push_str("</rect>");
    let center_x = node.x + node.width / 2.0;
    let center_y = node.y + node.height / 2.0;
    out.push_str(&format!(
        "<text x=\"{center_x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">+</text>",
        center_y + 5.0,
        theme.font_family,
        node.height * 0.6,
        theme.placeholder_text_color
    ));
    out.push_str("</g>");
    out
}

fn card_svg(node: &PositionedNode, theme: &Theme) -> String {
    let mut out = String::new();
    let (border, border_width) = if node.is_root {
        (theme.root_border_color.as_str(), 2.5)
    } else {
        (theme.card_border.as_str(), 1.4)
    };

    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{CARD_RADIUS}\" fill=\"{}\" stroke=\"{border}\" stroke-width=\"{border_width}\"/>",
        node.x, node.y, node.width, node.height, theme.card_fill
    ));
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{TITLE_BAND_HEIGHT}\" rx=\"{CARD_RADIUS}\" fill=\"{}\"/>",
        node.x, node.y, node.width, node.title_bg_color
    ));
    out.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
        node.x + CARD_PAD,
        node.y + TITLE_BAND_HEIGHT - 6.0,
        theme.font_family,
        theme.font_size,
        node.title_text_color,
        escape_xml(&node.title)
    ));

    let subtitle_size = (theme.font_size - 2.0).max(8.0);
    let mut line_y = node.y + TITLE_BAND_HEIGHT + subtitle_size + 4.0;
    for subtitle in &node.subtitles {
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{line_y:.2}\" font-family=\"{}\" font-size=\"{subtitle_size:.1}\" fill=\"{}\">{}</text>",
            node.x + CARD_PAD,
            theme.font_family,
            theme.subtitle_color,
            escape_xml(subtitle)
        ));
        line_y += subtitle_size + 3.0;
    }
    if let Some(relation) = &node.relation_to_selected {
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{line_y:.2}\" font-family=\"{}\" font-size=\"{subtitle_size:.1}\" fill=\"{}\">relation: {}</text>",
            node.x + CARD_PAD,
            theme.font_family,
            theme.relation_label_color,
            escape_xml(relation)
        ));
    }

    // Profile disc (or image) in the upper right of the content area.
    let profile_cx = node.x + node.width - PROFILE_RADIUS - CARD_PAD;
    let profile_cy = node.y + TITLE_BAND_HEIGHT + PROFILE_RADIUS + 6.0;
    match &node.image_url {
        Some(url) => {
            out.push_str(&format!(
                "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" href=\"{}\"/>",
                profile_cx - PROFILE_RADIUS,
                profile_cy - PROFILE_RADIUS,
                PROFILE_RADIUS * 2.0,
                PROFILE_RADIUS * 2.0,
                escape_xml(url)
            ));
        }
        None => {
            let fill = match node.sex {
                crate::ir::Sex::M => &theme.male_color,
                crate::ir::Sex::F => &theme.female_color,
            };
            out.push_str(&format!(
                "<circle cx=\"{profile_cx:.2}\" cy=\"{profile_cy:.2}\" r=\"{PROFILE_RADIUS}\" fill=\"{fill}\"/>"
            ));
        }
    }

    // Badge chips along the bottom edge of the card.
    let chip_size = (theme.font_size - 4.0).max(7.0);
    let mut chip_x = node.x + CARD_PAD;
    let chip_y = node.y + node.height - CHIP_HEIGHT - 6.0;
    for badge in &node.badges {
        let label_width = text_metrics::measure_text_width(&badge.label, chip_size, &theme.font_family)
            .unwrap_or_else(|| badge.label.chars().count() as f32 * chip_size * 0.56);
        let chip_width = label_width + 10.0;
        out.push_str(&format!(
            "<rect x=\"{chip_x:.2}\" y=\"{chip_y:.2}\" width=\"{chip_width:.2}\" height=\"{CHIP_HEIGHT}\" rx=\"{:.1}\" fill=\"{}\"/>",
            CHIP_HEIGHT / 2.0,
            badge.bg_color
        ));
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{chip_size:.1}\" fill=\"{}\">{}</text>",
            chip_x + chip_width / 2.0,
            chip_y + CHIP_HEIGHT - 3.5,
            theme.font_family,
            badge.text_color,
            escape_xml(&badge.label)
        ));
        chip_x += chip_width + 6.0;
    }

    out
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the 'png' feature; rebuild with --features png"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::FamilyDiagram;
    use crate::ir::{RawFamilyMember, RawFamilyRelation, RawMemberData, RelationType, Sex};

    fn raw_member(id: &str, title: &str) -> RawFamilyMember {
        RawFamilyMember {
            id: id.to_string(),
            data: RawMemberData {
                badges: vec![crate::ir::Badge {
                    bg_color: "#334455".to_string(),
                    label: "heir".to_string(),
                    text_color: "#ffffff".to_string(),
                }],
                sex: Sex::M,
                subtitles: vec!["1900-1980".to_string()],
                title: title.to_string(),
                title_bg_color: "#224488".to_string(),
                title_text_color: "#ffffff".to_string(),
                image_url: None,
            },
        }
    }

    fn diagram() -> FamilyDiagram {
        let members = vec![
            raw_member("1", "Arthur <Senior>"),
            raw_member("2", "Beatrix"),
            raw_member("3", "Cedric"),
        ];
        let relations = vec![
            RawFamilyRelation {
                from_id: "1".to_string(),
                to_id: "2".to_string(),
                relation_type: RelationType::Married,
                pretty_type: "married".to_string(),
                is_inner_family: false,
            },
            RawFamilyRelation {
                from_id: "1".to_string(),
                to_id: "3".to_string(),
                relation_type: RelationType::Child,
                pretty_type: "child".to_string(),
                is_inner_family: true,
            },
        ];
        FamilyDiagram::new(&members, &relations, Some("1"))
    }

    #[test]
    fn render_svg_basic() {
        let diagram = diagram();
        let svg = diagram.svg();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Arthur &lt;Senior&gt;"));
        assert!(svg.contains("1900-1980"));
        assert!(svg.contains("heir"));
        // one couple line and one family path
        assert!(svg.matches("<path").count() >= 2);
    }

    #[test]
    fn collapsed_member_renders_a_placeholder() {
        let mut diagram = diagram();
        diagram.set_visibility("3", false);
        let svg = diagram.svg();
        assert!(svg.contains(">+</text>"));
        assert!(svg.contains("<title>Cedric</title>"));
        // the full card for Cedric is gone
        assert!(!svg.contains(">Cedric</text>"));
    }

    #[test]
    fn root_card_uses_the_highlight_border() {
        let diagram = diagram();
        let svg = diagram.svg();
        assert!(svg.contains(&diagram.theme.root_border_color));
    }
}
