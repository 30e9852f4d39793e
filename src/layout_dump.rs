use crate::layout::TreeLayout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Serialize)]
struct NodeDump<'a> {
    id: &'a str,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    generation: usize,
    col: f32,
    hidden: bool,
    is_root: bool,
}

#[derive(Serialize)]
struct CoupleEdgeDump<'a> {
    id: &'a str,
    source: &'a str,
    target: &'a str,
}

#[derive(Serialize)]
struct FamilyEdgeDump<'a> {
    id: &'a str,
    source: &'a str,
    target: &'a str,
    family_index: usize,
    offset_y: f32,
}

#[derive(Serialize)]
struct LayoutDump<'a> {
    width: f32,
    height: f32,
    nodes: Vec<NodeDump<'a>>,
    couple_edges: Vec<CoupleEdgeDump<'a>>,
    family_edges: Vec<FamilyEdgeDump<'a>>,
}

/// Writes the positioned graph as JSON, for eyeballing layout regressions
/// without rendering.
pub fn write_layout_dump(path: &Path, layout: &TreeLayout) -> anyhow::Result<()> {
    let dump = LayoutDump {
        width: layout.width,
        height: layout.height,
        nodes: layout
            .nodes
            .values()
            .map(|node| NodeDump {
                id: &node.id,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                generation: node.generation,
                col: node.col,
                hidden: node.hidden,
                is_root: node.is_root,
            })
            .collect(),
        couple_edges: layout
            .couple_edges
            .iter()
            .map(|edge| CoupleEdgeDump {
                id: &edge.id,
                source: &edge.source,
                target: &edge.target,
            })
            .collect(),
        family_edges: layout
            .family_edges
            .iter()
            .map(|edge| FamilyEdgeDump {
                id: &edge.id,
                source: &edge.source,
                target: &edge.target,
                family_index: edge.family_index,
                offset_y: edge.offset_y,
            })
            .collect(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
