use crate::ir::{
    FamilyMembers, FamilyRelations, RawFamilyMember, RawFamilyRelation, build_family_and_relations,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid family input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("family input contains no members")]
    Empty,
}

/// On-disk input shape: the two raw collections under one object, as the
/// host page hands them over.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyInput {
    pub family_members: Vec<RawFamilyMember>,
    #[serde(default)]
    pub family_relations: Vec<RawFamilyRelation>,
}

#[derive(Debug, Clone)]
pub struct ParsedFamily {
    pub members: FamilyMembers,
    pub relations: FamilyRelations,
}

/// Parses the JSON source document and builds the entity maps. Shape errors
/// (bad JSON, unknown relation type, missing fields) surface here; dangling
/// member references do not — those degrade at layout time.
pub fn parse_family(input: &str) -> Result<ParsedFamily, ParseError> {
    let parsed: FamilyInput = serde_json::from_str(input)?;
    if parsed.family_members.is_empty() {
        return Err(ParseError::Empty);
    }
    let (members, relations) =
        build_family_and_relations(&parsed.family_members, &parsed.family_relations);
    Ok(ParsedFamily { members, relations })
}
