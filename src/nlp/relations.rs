// Type-based relationship inference over extracted entities.
use serde::Serialize;

use crate::error::{require_min_chars, Result};
use crate::nlp::merge::{self, EntityCollection};
use crate::nlp::ner::EntityCategory;

/// Minimum input length for relationship analysis, in characters.
pub const MIN_RELATION_CHARS: usize = 20;

/// Relation labels, fixed per category pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    AssociatedWith,
    LocatedIn,
    BasedIn,
}

impl RelationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RelationKind::AssociatedWith => "associated_with",
            RelationKind::LocatedIn => "located_in",
            RelationKind::BasedIn => "based_in",
        }
    }
}

/// A directed, typed entity pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub entity1: String,
    pub entity2: String,
    pub kind: RelationKind,
    pub pair: (EntityCategory, EntityCategory),
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipReport {
    pub relationships: Vec<Relationship>,
    pub relationship_count: usize,
    pub pair_types: Vec<String>,
}

const PAIRS: [(EntityCategory, EntityCategory, RelationKind); 3] = [
    (
        EntityCategory::Person,
        EntityCategory::Organization,
        RelationKind::AssociatedWith,
    ),
    (
        EntityCategory::Person,
        EntityCategory::Location,
        RelationKind::LocatedIn,
    ),
    (
        EntityCategory::Organization,
        EntityCategory::Location,
        RelationKind::BasedIn,
    ),
];

/// Emits the full cartesian product for each category pair.
///
/// Purely type-based: textual proximity is not consulted, so P persons
/// and O organizations always produce exactly P x O associations.
pub fn relationships(entities: &EntityCollection) -> RelationshipReport {
    let mut out = Vec::new();

    for (left, right, kind) in PAIRS {
        for a in entities.get(left) {
            for b in entities.get(right) {
                out.push(Relationship {
                    entity1: a.text.clone(),
                    entity2: b.text.clone(),
                    kind,
                    pair: (left, right),
                });
            }
        }
    }

    let mut pair_types: Vec<String> = Vec::new();
    for rel in &out {
        let label = format!("{}-{}", rel.pair.0, rel.pair.1);
        if !pair_types.contains(&label) {
            pair_types.push(label);
        }
    }

    RelationshipReport {
        relationship_count: out.len(),
        relationships: out,
        pair_types,
    }
}

/// Extracts entities and infers relationships in one pass.
pub fn analyze(text: &str) -> Result<(merge::ExtractionReport, RelationshipReport)> {
    require_min_chars(text, MIN_RELATION_CHARS)?;
    let report = merge::extract_entities(text)?;
    let relations = relationships(&report.entities);
    Ok((report, relations))
}
