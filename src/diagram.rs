use crate::config::LayoutConfig;
use crate::ir::{
    FamilyMembers, FamilyRelations, RawFamilyMember, RawFamilyRelation, build_family_and_relations,
};
use crate::layout::{PositionedNode, TreeLayout, compute_layout};
use crate::theme::Theme;

/// The one stateful object of the crate: owns the entity maps, the root
/// selection and the presentation settings, and answers every layout request
/// from the current snapshot. Collapse state lives on the members themselves;
/// recomputing the layout is how a change becomes visible (there is no cached
/// geometry to invalidate).
#[derive(Debug, Clone)]
pub struct FamilyDiagram {
    members: FamilyMembers,
    relations: FamilyRelations,
    root: Option<String>,
    pub theme: Theme,
    pub config: LayoutConfig,
}

impl FamilyDiagram {
    /// Builds a diagram from raw records. `root_id` of `None` (or an id not
    /// present in the input) means "pick any member".
    pub fn new(
        raw_members: &[RawFamilyMember],
        raw_relations: &[RawFamilyRelation],
        root_id: Option<&str>,
    ) -> Self {
        let (members, relations) = build_family_and_relations(raw_members, raw_relations);
        Self::from_maps(members, relations, root_id)
    }

    pub fn from_maps(
        members: FamilyMembers,
        relations: FamilyRelations,
        root_id: Option<&str>,
    ) -> Self {
        Self {
            members,
            relations,
            root: root_id.map(str::to_string),
            theme: Theme::default(),
            config: LayoutConfig::default(),
        }
    }

    pub fn members(&self) -> &FamilyMembers {
        &self.members
    }

    pub fn relations(&self) -> &FamilyRelations {
        &self.relations
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, root_id: Option<&str>) {
        self.root = root_id.map(str::to_string);
    }

    /// Annotates a member with its relation to the currently selected
    /// member, shown as an extra card line.
    pub fn set_relation_to_selected(&mut self, id: &str, relation: Option<String>) {
        if let Some(member) = self.members.get_mut(id) {
            member.relation_to_selected = relation;
        }
    }

    /// The collapse controller. `is_visible = false` collapses the member to
    /// a placeholder, `true` expands it again. Only the member's flag
    /// changes; the relation map is untouched, so expanding restores the
    /// exact previous geometry. Unknown ids are ignored.
    pub fn set_visibility(&mut self, id: &str, is_visible: bool) {
        if let Some(member) = self.members.get_mut(id) {
            member.hidden = !is_visible;
        }
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.members.get(id).map(|member| member.hidden).unwrap_or(false)
    }

    /// Computes the positioned graph for the current state.
    pub fn layout(&self) -> TreeLayout {
        compute_layout(
            &self.members,
            &self.relations,
            self.root.as_deref(),
            &self.theme,
            &self.config,
        )
    }

    pub fn svg(&self) -> String {
        crate::render::render_svg(&self.layout(), &self.theme, &self.config)
    }
}

/// Minimap hook: a node is represented by its title background color.
pub fn node_color_for_minimap(node: &PositionedNode) -> &str {
    &node.title_bg_color
}
