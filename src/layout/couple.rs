use crate::config::LayoutConfig;

use super::path::straight_path;
use super::types::{CoupleEdge, RoutedEdge, TreeLayout};

/// Stacking function for couple lines sharing a generation: rank 0 sits on
/// the centerline, later ranks alternate below and above it (+1, -1, +2,
/// -2, ...), so no two ranks map to the same offset.
fn couple_edge_y_offset(rank: usize) -> f32 {
    if rank == 0 {
        return 0.0;
    }
    let step = rank.div_ceil(2) as f32;
    if rank % 2 == 1 { step } else { -step }
}

/// Routes one partner connection. Consults the live node and edge sets on
/// every call: all couple edges whose source sits on this edge's row are
/// ranked by id, and the rank picks a vertical offset so concurrent
/// partnerships at one generation never overlap. Returns `None` when either
/// endpoint is missing from the current node set.
pub fn route_couple_edge(
    edge: &CoupleEdge,
    layout: &TreeLayout,
    config: &LayoutConfig,
) -> Option<RoutedEdge> {
    let source = layout.nodes.get(&edge.source)?;
    let target = layout.nodes.get(&edge.target)?;

    let (source_x, source_y) = source.center();
    let (target_x, target_y) = target.center();

    let mut same_row: Vec<&str> = layout
        .couple_edges
        .iter()
        .filter(|other| {
            let Some(other_source) = layout.nodes.get(&other.source) else {
                return false;
            };
            if !layout.nodes.contains_key(&other.target) {
                return false;
            }
            other_source.y == source.y
        })
        .map(|other| other.id.as_str())
        .collect();
    same_row.sort_unstable();

    let rank = same_row.iter().position(|id| *id == edge.id)?;
    let offset = couple_edge_y_offset(rank) * config.couple_edge_unit;

    Some(straight_path(
        source_x,
        source_y + offset,
        target_x,
        target_y + offset,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Badge, Sex};
    use crate::layout::types::PositionedNode;
    use std::collections::HashSet;

    fn node(id: &str, x: f32, y: f32) -> PositionedNode {
        PositionedNode {
            id: id.to_string(),
            x,
            y,
            width: 160.0,
            height: 80.0,
            generation: 0,
            col: 0.0,
            title: id.to_string(),
            subtitles: Vec::new(),
            sex: Sex::F,
            image_url: None,
            badges: Vec::<Badge>::new(),
            title_bg_color: "#fff".to_string(),
            title_text_color: "#000".to_string(),
            is_root: false,
            relation_to_selected: None,
            hidden: false,
        }
    }

    fn couple(id: &str, source: &str, target: &str) -> CoupleEdge {
        CoupleEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            pretty_type: "married".to_string(),
        }
    }

    fn layout_with(nodes: Vec<PositionedNode>, edges: Vec<CoupleEdge>) -> TreeLayout {
        let mut layout = TreeLayout::default();
        for node in nodes {
            layout.nodes.insert(node.id.clone(), node);
        }
        layout.couple_edges = edges;
        layout
    }

    #[test]
    fn stacking_function_alternates() {
        assert_eq!(couple_edge_y_offset(0), 0.0);
        assert_eq!(couple_edge_y_offset(1), 1.0);
        assert_eq!(couple_edge_y_offset(2), -1.0);
        assert_eq!(couple_edge_y_offset(3), 2.0);
        assert_eq!(couple_edge_y_offset(4), -2.0);
    }

    #[test]
    fn single_couple_edge_gets_zero_offset() {
        let layout = layout_with(
            vec![node("1", 0.0, 0.0), node("2", 200.0, 0.0)],
            vec![couple("1-2", "1", "2")],
        );
        let routed = route_couple_edge(&layout.couple_edges[0], &layout, &LayoutConfig::default())
            .unwrap();
        // both endpoints at center height, no stacking shift
        assert_eq!(routed.path, "M 80.00 40.00 L 280.00 40.00");
    }

    #[test]
    fn concurrent_couples_at_one_generation_fan_out() {
        // 1 is partnered with both 2 and 4 on the same row.
        let layout = layout_with(
            vec![
                node("1", 200.0, 0.0),
                node("2", 0.0, 0.0),
                node("4", 400.0, 0.0),
            ],
            vec![couple("1-2", "1", "2"), couple("1-4", "1", "4")],
        );
        let config = LayoutConfig::default();
        let first = route_couple_edge(&layout.couple_edges[0], &layout, &config).unwrap();
        let second = route_couple_edge(&layout.couple_edges[1], &layout, &config).unwrap();
        assert_ne!(first.label_y, second.label_y);
        assert_eq!((first.label_y - second.label_y).abs(), config.couple_edge_unit);
    }

    #[test]
    fn offsets_are_distinct_for_many_edges() {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        for index in 0..6 {
            let a = format!("a{index}");
            let b = format!("b{index}");
            nodes.push(node(&a, index as f32 * 400.0, 0.0));
            nodes.push(node(&b, index as f32 * 400.0 + 200.0, 0.0));
            edges.push(couple(&format!("{a}-{b}"), &a, &b));
        }
        let layout = layout_with(nodes, edges);
        let config = LayoutConfig::default();
        let offsets: HashSet<i64> = layout
            .couple_edges
            .iter()
            .map(|edge| {
                let routed = route_couple_edge(edge, &layout, &config).unwrap();
                routed.label_y.round() as i64
            })
            .collect();
        assert_eq!(offsets.len(), 6);
    }

    #[test]
    fn rows_are_ranked_independently() {
        let layout = layout_with(
            vec![
                node("1", 0.0, 0.0),
                node("2", 200.0, 0.0),
                node("3", 0.0, 180.0),
                node("4", 200.0, 180.0),
            ],
            vec![couple("1-2", "1", "2"), couple("3-4", "3", "4")],
        );
        let config = LayoutConfig::default();
        let top = route_couple_edge(&layout.couple_edges[0], &layout, &config).unwrap();
        let bottom = route_couple_edge(&layout.couple_edges[1], &layout, &config).unwrap();
        // each row has a single edge, so both stay on their centerline
        assert_eq!(top.label_y, 40.0);
        assert_eq!(bottom.label_y, 220.0);
    }

    #[test]
    fn missing_endpoint_renders_nothing() {
        let layout = layout_with(vec![node("1", 0.0, 0.0)], vec![couple("1-2", "1", "2")]);
        assert!(
            route_couple_edge(&layout.couple_edges[0], &layout, &LayoutConfig::default()).is_none()
        );
    }

    #[test]
    fn routing_is_idempotent() {
        let layout = layout_with(
            vec![
                node("1", 200.0, 0.0),
                node("2", 0.0, 0.0),
                node("4", 400.0, 0.0),
            ],
            vec![couple("1-2", "1", "2"), couple("1-4", "1", "4")],
        );
        let config = LayoutConfig::default();
        let first = route_couple_edge(&layout.couple_edges[1], &layout, &config).unwrap();
        let again = route_couple_edge(&layout.couple_edges[1], &layout, &config).unwrap();
        assert_eq!(first, again);
    }
}
