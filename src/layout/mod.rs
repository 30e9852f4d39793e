mod couple;
mod family;
pub(crate) mod path;
pub(crate) mod types;

pub use couple::route_couple_edge;
pub use family::route_family_edge;
pub use path::{smooth_step_path, straight_path};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{FamilyMembers, FamilyRelations};
use crate::text_metrics;
use crate::theme::Theme;
use std::collections::{HashMap, HashSet, VecDeque};

/// Extra card width around the widest text line.
const CARD_TEXT_PAD: f32 = 32.0;
/// Minimum clearance kept between a sibling rail and the row above it.
const RAIL_CLEARANCE: f32 = 10.0;

/// One sibling group: the set of parents shared by its children. Keyed by
/// the sorted parent-id set; the vector index is the group's `family_index`.
#[derive(Debug, Clone)]
struct FamilyGroup {
    parents: Vec<String>,
    children: Vec<String>,
}

/// A couple unit (a member plus the partners laid out beside it) and the
/// child blocks hanging under it.
#[derive(Debug)]
struct UnitBlock {
    members: Vec<String>,
    children: Vec<UnitBlock>,
    unit_width: f32,
    width: f32,
}

struct TreeContext<'a> {
    members: &'a FamilyMembers,
    config: &'a LayoutConfig,
    partners: HashMap<String, Vec<String>>,
    families: Vec<FamilyGroup>,
    family_of_child: HashMap<String, usize>,
    sizes: HashMap<String, (f32, f32)>,
    rows: HashMap<String, usize>,
}

/// Assigns every reachable member a generation row and a horizontal
/// position, then materializes the couple and inner-family edges with their
/// grouping metadata. Pure function of the current entity maps; recomputed
/// in full whenever the graph, the root, or a collapse flag changes.
pub fn compute_layout(
    members: &FamilyMembers,
    relations: &FamilyRelations,
    root_id: Option<&str>,
    theme: &Theme,
    config: &LayoutConfig,
) -> TreeLayout {
    let Some(root) = resolve_root(members, root_id) else {
        return TreeLayout::default();
    };

    let (partners, children_of, parents_of) = build_adjacency(members, relations);
    let (families, family_of_child) = collect_families(relations, members, &parents_of);

    let (generations, order) =
        assign_generations(&root, members, &partners, &children_of, &parents_of);
    let min_gen = generations.values().copied().min().unwrap_or(0);
    let rows: HashMap<String, usize> = generations
        .iter()
        .map(|(id, r#gen)| (id.clone(), (r#gen - min_gen) as usize))
        .collect();

    let sizes: HashMap<String, (f32, f32)> = rows
        .keys()
        .map(|id| (id.clone(), member_size(&members[id], theme, config)))
        .collect();

    let ctx = TreeContext {
        members,
        config,
        partners,
        families,
        family_of_child,
        sizes,
        rows,
    };

    let mut visited: HashSet<String> = HashSet::new();
    let mut positions: HashMap<String, f32> = HashMap::new();
    let mut cursor = 0.0f32;

    // Top-row units first; everything below them falls out of the recursion.
    for id in order.iter().filter(|id| ctx.rows[*id] == 0) {
        if visited.contains(id) {
            continue;
        }
        let block = build_block(id, &mut visited, &ctx);
        place_block(&block, cursor, &ctx, &mut positions);
        cursor += block.width + config.subtree_gap;
    }
    // Stragglers the downward pass never reaches (e.g. in-law ancestors whose
    // only child is already placed) are appended on the right of the diagram.
    for id in &order {
        if visited.contains(id) {
            continue;
        }
        let block = build_block(id, &mut visited, &ctx);
        place_block(&block, cursor, &ctx, &mut positions);
        cursor += block.width + config.subtree_gap;
    }

    finish_layout(&root, relations, &ctx, &positions)
}

fn resolve_root(members: &FamilyMembers, root_id: Option<&str>) -> Option<String> {
    match root_id {
        Some(id) if members.contains_key(id) => Some(id.to_string()),
        // Absent or unknown root: silently substitute the first member.
        _ => members.keys().next().cloned(),
    }
}

#[allow(clippy::type_complexity)]
fn build_adjacency(
    members: &FamilyMembers,
    relations: &FamilyRelations,
) -> (
    HashMap<String, Vec<String>>,
    HashMap<String, Vec<String>>,
    HashMap<String, Vec<String>>,
) {
    let mut partners: HashMap<String, Vec<String>> = HashMap::new();
    let mut children_of: HashMap<String, Vec<String>> = HashMap::new();
    let mut parents_of: HashMap<String, Vec<String>> = HashMap::new();

    for relation in relations.values() {
        if relation.to == relation.from {
            continue;
        }
        if !members.contains_key(&relation.to) || !members.contains_key(&relation.from) {
            continue;
        }
        if relation.is_inner_family {
            // Inner relations carry the parent in `to` and the child in
            // `from` (the builder's endpoint swap).
            let parent = relation.to.clone();
            let child = relation.from.clone();
            push_unique(children_of.entry(parent.clone()).or_default(), &child);
            push_unique(parents_of.entry(child).or_default(), &parent);
        } else {
            push_unique(
                partners.entry(relation.to.clone()).or_default(),
                &relation.from,
            );
            push_unique(
                partners.entry(relation.from.clone()).or_default(),
                &relation.to,
            );
        }
    }

    (partners, children_of, parents_of)
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

/// Groups the inner-family relations into sibling groups. The grouping key
/// is the child's full parent set, so full siblings share one group while a
/// remarried parent's other children form their own.
fn collect_families(
    relations: &FamilyRelations,
    members: &FamilyMembers,
    parents_of: &HashMap<String, Vec<String>>,
) -> (Vec<FamilyGroup>, HashMap<String, usize>) {
    let mut families: Vec<FamilyGroup> = Vec::new();
    let mut index_by_key: HashMap<Vec<String>, usize> = HashMap::new();
    let mut family_of_child: HashMap<String, usize> = HashMap::new();

    for relation in relations.values() {
        if !relation.is_inner_family {
            continue;
        }
        if !members.contains_key(&relation.to) || !members.contains_key(&relation.from) {
            continue;
        }
        let child = &relation.from;
        let mut key = parents_of.get(child).cloned().unwrap_or_default();
        key.sort();
        let index = *index_by_key.entry(key.clone()).or_insert_with(|| {
            families.push(FamilyGroup {
                parents: key,
                children: Vec::new(),
            });
            families.len() - 1
        });
        push_unique(&mut families[index].children, child);
        family_of_child.insert(child.clone(), index);
    }

    (families, family_of_child)
}

/// BFS over the relation graph: partners share a row, children sit one row
/// below, parents one above. Child links of a collapsed member are not
/// followed, which is what shrinks its subtree away. Returns the relative
/// generations and the discovery order (the placement passes iterate it for
/// determinism).
fn assign_generations(
    root: &str,
    members: &FamilyMembers,
    partners: &HashMap<String, Vec<String>>,
    children_of: &HashMap<String, Vec<String>>,
    parents_of: &HashMap<String, Vec<String>>,
) -> (HashMap<String, i32>, Vec<String>) {
    let mut generations: HashMap<String, i32> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    let mut queue: VecDeque<String> = VecDeque::new();

    generations.insert(root.to_string(), 0);
    order.push(root.to_string());
    queue.push_back(root.to_string());

    while let Some(id) = queue.pop_front() {
        let r#gen = generations[&id];
        let hidden = members[&id].hidden;

        let enqueue = |neighbor: &String,
                           r#gen: i32,
                           generations: &mut HashMap<String, i32>,
                           order: &mut Vec<String>,
                           queue: &mut VecDeque<String>| {
            if !generations.contains_key(neighbor) {
                generations.insert(neighbor.clone(), r#gen);
                order.push(neighbor.clone());
                queue.push_back(neighbor.clone());
            }
        };

        if let Some(list) = partners.get(&id) {
            for partner in list {
                enqueue(partner, r#gen, &mut generations, &mut order, &mut queue);
            }
        }
        if let Some(list) = parents_of.get(&id) {
            for parent in list {
                enqueue(parent, r#gen - 1, &mut generations, &mut order, &mut queue);
            }
        }
        if !hidden && let Some(list) = children_of.get(&id) {
            for child in list {
                enqueue(child, r#gen + 1, &mut generations, &mut order, &mut queue);
            }
        }
    }

    (generations, order)
}

fn member_size(
    member: &crate::ir::FamilyMember,
    theme: &Theme,
    config: &LayoutConfig,
) -> (f32, f32) {
    if member.hidden {
        return (config.placeholder_size, config.placeholder_size);
    }
    let mut widest = 0.0f32;
    for line in std::iter::once(&member.title).chain(member.subtitles.iter()) {
        widest = widest.max(text_width(line, theme.font_size, &theme.font_family));
    }
    let width = (widest + CARD_TEXT_PAD)
        .max(config.node_width)
        .min(config.max_node_width);
    (width, config.node_height)
}

fn text_width(text: &str, font_size: f32, font_family: &str) -> f32 {
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| text.chars().count() as f32 * font_size * 0.56)
}

/// Builds the couple unit rooted at `member` and, recursively, the blocks of
/// every sibling group whose parents sit in this unit. Marks everything it
/// takes as visited so shared descendants are claimed exactly once.
fn build_block(member: &str, visited: &mut HashSet<String>, ctx: &TreeContext<'_>) -> UnitBlock {
    let row = ctx.rows[member];
    let mut unit: Vec<String> = vec![member.to_string()];
    visited.insert(member.to_string());
    if let Some(list) = ctx.partners.get(member) {
        for partner in list {
            if ctx.rows.get(partner) == Some(&row) && visited.insert(partner.clone()) {
                unit.push(partner.clone());
            }
        }
    }

    let mut children: Vec<UnitBlock> = Vec::new();
    for group in &ctx.families {
        if !group.parents.iter().any(|parent| unit.contains(parent)) {
            continue;
        }
        for child in &group.children {
            if visited.contains(child) || !ctx.rows.contains_key(child) {
                continue;
            }
            children.push(build_block(child, visited, ctx));
        }
    }

    let unit_width = unit.iter().map(|id| ctx.sizes[id].0).sum::<f32>()
        + ctx.config.couple_gap * (unit.len() as f32 - 1.0);
    let children_width = block_row_width(&children, ctx.config.sibling_gap);
    UnitBlock {
        members: unit,
        children,
        unit_width,
        width: unit_width.max(children_width),
    }
}

fn block_row_width(blocks: &[UnitBlock], gap: f32) -> f32 {
    if blocks.is_empty() {
        return 0.0;
    }
    blocks.iter().map(|block| block.width).sum::<f32>() + gap * (blocks.len() as f32 - 1.0)
}

/// Second pass: assigns left x-coordinates, centering the unit over its
/// children block (or the children under a wider unit).
fn place_block(
    block: &UnitBlock,
    x0: f32,
    ctx: &TreeContext<'_>,
    positions: &mut HashMap<String, f32>,
) {
    let mut unit_x = x0 + (block.width - block.unit_width) / 2.0;
    for id in &block.members {
        positions.insert(id.clone(), unit_x);
        unit_x += ctx.sizes[id].0 + ctx.config.couple_gap;
    }

    let children_width = block_row_width(&block.children, ctx.config.sibling_gap);
    let mut child_x = x0 + (block.width - children_width) / 2.0;
    for child in &block.children {
        place_block(child, child_x, ctx, positions);
        child_x += child.width + ctx.config.sibling_gap;
    }
}

fn finish_layout(
    root: &str,
    relations: &FamilyRelations,
    ctx: &TreeContext<'_>,
    positions: &HashMap<String, f32>,
) -> TreeLayout {
    let config = ctx.config;
    let mut layout = TreeLayout::default();

    let min_x = positions.values().copied().fold(f32::MAX, f32::min);
    let shift_x = config.padding - if min_x.is_finite() { min_x } else { 0.0 };

    let root_center = positions
        .get(root)
        .map(|x| x + ctx.sizes[root].0 / 2.0)
        .unwrap_or(0.0);
    let col_unit = config.node_width + config.couple_gap;

    for (id, x) in positions {
        let member = &ctx.members[id];
        let (width, height) = ctx.sizes[id];
        let row = ctx.rows[id];
        let y = row as f32 * (config.node_height + config.generation_gap) + config.padding;
        layout.nodes.insert(
            id.clone(),
            PositionedNode {
                id: id.clone(),
                x: x + shift_x,
                y,
                width,
                height,
                generation: row,
                col: (x + width / 2.0 - root_center) / col_unit,
                title: member.title.clone(),
                subtitles: member.subtitles.clone(),
                sex: member.sex,
                image_url: member.image_url.clone(),
                badges: member.badges.clone(),
                title_bg_color: member.title_bg_color.clone(),
                title_text_color: member.title_text_color.clone(),
                is_root: id.as_str() == root,
                relation_to_selected: member.relation_to_selected.clone(),
                hidden: member.hidden,
            },
        );
    }

    // Rail heights: one rank per family within each child row, so sibling
    // rails at a generation never share a height.
    let mut rail_rank: HashMap<usize, usize> = HashMap::new();
    let mut per_row: HashMap<usize, usize> = HashMap::new();
    for (index, group) in ctx.families.iter().enumerate() {
        let Some(row) = group
            .children
            .iter()
            .find_map(|child| ctx.rows.get(child).copied())
        else {
            continue;
        };
        let counter = per_row.entry(row).or_insert(0);
        rail_rank.insert(index, *counter);
        *counter += 1;
    }

    for relation in relations.values() {
        if !layout.nodes.contains_key(&relation.to) || !layout.nodes.contains_key(&relation.from) {
            continue;
        }
        if relation.is_inner_family {
            let Some(&family_index) = ctx.family_of_child.get(&relation.from) else {
                continue;
            };
            let rank = rail_rank.get(&family_index).copied().unwrap_or(0);
            let offset_y = (config.family_edge_base_offset
                + rank as f32 * config.family_edge_y_gap)
                .min(config.generation_gap - RAIL_CLEARANCE);
            layout.family_edges.push(InnerFamilyEdge {
                id: relation.id.clone(),
                source: relation.to.clone(),
                target: relation.from.clone(),
                family_index,
                offset_y,
            });
        } else {
            layout.couple_edges.push(CoupleEdge {
                id: relation.id.clone(),
                source: relation.to.clone(),
                target: relation.from.clone(),
                pretty_type: relation.pretty_type.clone(),
            });
        }
    }

    let max_x = layout
        .nodes
        .values()
        .map(|node| node.x + node.width)
        .fold(0.0f32, f32::max);
    let max_y = layout
        .nodes
        .values()
        .map(|node| node.y + node.height)
        .fold(0.0f32, f32::max);
    layout.width = max_x + config.padding;
    layout.height = max_y + config.padding;
    layout
}
