//! Path-generation primitives shared by the edge routers: a straight
//! segment and a rounded step path. Both return SVG path data plus the
//! anchor a label would attach to.

use super::types::RoutedEdge;

pub fn straight_path(source_x: f32, source_y: f32, target_x: f32, target_y: f32) -> RoutedEdge {
    RoutedEdge {
        path: format!("M {source_x:.2} {source_y:.2} L {target_x:.2} {target_y:.2}"),
        label_x: (source_x + target_x) / 2.0,
        label_y: (source_y + target_y) / 2.0,
    }
}

/// Step path for an edge that leaves the source downward and enters the
/// target from the top, with the horizontal run at `center_y` and rounded
/// corners. The degenerate vertically-aligned case collapses to a straight
/// segment.
pub fn smooth_step_path(
    source_x: f32,
    source_y: f32,
    target_x: f32,
    target_y: f32,
    center_y: f32,
    corner_radius: f32,
) -> RoutedEdge {
    if (source_x - target_x).abs() < 0.5 {
        return RoutedEdge {
            path: format!("M {source_x:.2} {source_y:.2} L {target_x:.2} {target_y:.2}"),
            label_x: (source_x + target_x) / 2.0,
            label_y: center_y,
        };
    }

    let points = [
        (source_x, source_y),
        (source_x, center_y),
        (target_x, center_y),
        (target_x, target_y),
    ];
    RoutedEdge {
        path: rounded_polyline(&points, corner_radius),
        label_x: (source_x + target_x) / 2.0,
        label_y: center_y,
    }
}

/// Renders an orthogonal polyline with each interior corner replaced by a
/// quadratic arc. The corner radius shrinks to fit short segments.
fn rounded_polyline(points: &[(f32, f32)], radius: f32) -> String {
    if points.is_empty() {
        return String::new();
    }
    let mut d = format!("M {:.2} {:.2}", points[0].0, points[0].1);
    for idx in 1..points.len() - 1 {
        let prev = points[idx - 1];
        let corner = points[idx];
        let next = points[idx + 1];
        let len_in = segment_length(prev, corner);
        let len_out = segment_length(corner, next);
        let r = radius.min(len_in / 2.0).min(len_out / 2.0).max(0.0);
        if r < 0.01 {
            d.push_str(&format!(" L {:.2} {:.2}", corner.0, corner.1));
            continue;
        }
        let entry = point_towards(corner, prev, r);
        let exit = point_towards(corner, next, r);
        d.push_str(&format!(
            " L {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
            entry.0, entry.1, corner.0, corner.1, exit.0, exit.1
        ));
    }
    let last = points[points.len() - 1];
    d.push_str(&format!(" L {:.2} {:.2}", last.0, last.1));
    d
}

fn segment_length(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt()
}

fn point_towards(from: (f32, f32), to: (f32, f32), distance: f32) -> (f32, f32) {
    let len = segment_length(from, to);
    if len < 1e-6 {
        return from;
    }
    let t = distance / len;
    (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_path_midpoint_label() {
        let routed = straight_path(0.0, 0.0, 10.0, 20.0);
        assert_eq!(routed.path, "M 0.00 0.00 L 10.00 20.00");
        assert_eq!(routed.label_x, 5.0);
        assert_eq!(routed.label_y, 10.0);
    }

    #[test]
    fn step_path_bends_at_center_y() {
        let routed = smooth_step_path(0.0, 0.0, 100.0, 100.0, 60.0, 5.0);
        assert!(routed.path.starts_with("M 0.00 0.00"));
        assert!(routed.path.contains("Q 0.00 60.00"));
        assert!(routed.path.contains("Q 100.00 60.00"));
        assert!(routed.path.ends_with("L 100.00 100.00"));
        assert_eq!(routed.label_y, 60.0);
    }

    #[test]
    fn aligned_endpoints_collapse_to_a_line() {
        let routed = smooth_step_path(50.0, 0.0, 50.0, 100.0, 60.0, 5.0);
        assert_eq!(routed.path, "M 50.00 0.00 L 50.00 100.00");
    }

    #[test]
    fn radius_clamps_to_short_segments() {
        // 4px horizontal run cannot host two 5px corners.
        let routed = smooth_step_path(0.0, 0.0, 4.0, 100.0, 50.0, 5.0);
        assert!(routed.path.contains('Q'));
    }
}
