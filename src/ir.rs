use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub bg_color: String,
    pub label: String,
    pub text_color: String,
}

/// Closed set of relation kinds. `is_inner_family` on the relation itself is
/// what separates partnership edges from parent-child edges; the kind only
/// refines the label semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationType {
    Partner,
    Married,
    Divorced,
    Child,
    AdoptedChild,
    StepChild,
}

#[derive(Debug, Clone)]
pub struct FamilyMember {
    pub id: String,
    pub title: String,
    pub subtitles: Vec<String>,
    pub sex: Sex,
    pub image_url: Option<String>,
    pub badges: Vec<Badge>,
    pub title_bg_color: String,
    pub title_text_color: String,
    pub is_root: bool,
    pub relation_to_selected: Option<String>,
    /// Collapsed flag. The one field the collapse controller mutates;
    /// members are never removed from the map during a session.
    pub hidden: bool,
}

#[derive(Debug, Clone)]
pub struct FamilyRelation {
    pub id: String,
    pub to: String,
    pub from: String,
    pub relation_type: RelationType,
    pub pretty_type: String,
    pub is_inner_family: bool,
}

pub type FamilyMembers = BTreeMap<String, FamilyMember>;
pub type FamilyRelations = BTreeMap<String, FamilyRelation>;

#[derive(Debug, Clone, Deserialize)]
pub struct RawFamilyMember {
    pub id: String,
    pub data: RawMemberData,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMemberData {
    pub badges: Vec<Badge>,
    pub sex: Sex,
    pub subtitles: Vec<String>,
    pub title: String,
    pub title_bg_color: String,
    pub title_text_color: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFamilyRelation {
    pub from_id: String,
    pub to_id: String,
    pub relation_type: RelationType,
    pub pretty_type: String,
    pub is_inner_family: bool,
}

/// Builds the two keyed entity maps from raw records. Lookups are always by
/// id, so input order is irrelevant; a duplicate id overwrites the earlier
/// record (last-wins map semantics, not an error).
///
/// Relation ids are `fromId-toId`. Note that `to` receives the raw `fromId`
/// and `from` the raw `toId`: the layout engine reads `to` as the parent side
/// of inner-family relations, so the swap is load-bearing and kept as is.
/// No referential integrity is checked here; a relation naming an unknown
/// member simply produces no edge at layout time.
pub fn build_family_and_relations(
    raw_members: &[RawFamilyMember],
    raw_relations: &[RawFamilyRelation],
) -> (FamilyMembers, FamilyRelations) {
    let mut members = FamilyMembers::new();
    for raw in raw_members {
        members.insert(
            raw.id.clone(),
            FamilyMember {
                id: raw.id.clone(),
                title: raw.data.title.clone(),
                subtitles: raw.data.subtitles.clone(),
                sex: raw.data.sex,
                image_url: raw.data.image_url.clone(),
                badges: raw.data.badges.clone(),
                title_bg_color: raw.data.title_bg_color.clone(),
                title_text_color: raw.data.title_text_color.clone(),
                is_root: false,
                relation_to_selected: None,
                hidden: false,
            },
        );
    }

    let mut relations = FamilyRelations::new();
    for raw in raw_relations {
        let id = format!("{}-{}", raw.from_id, raw.to_id);
        relations.insert(
            id.clone(),
            FamilyRelation {
                id,
                to: raw.from_id.clone(),
                from: raw.to_id.clone(),
                relation_type: raw.relation_type,
                pretty_type: raw.pretty_type.clone(),
                is_inner_family: raw.is_inner_family,
            },
        );
    }

    (members, relations)
}
