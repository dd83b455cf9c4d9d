use serde::Serialize;

use super::{EntityId, FieldRef};

/// Closed set of relationship cardinalities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    /// Parse a document spelling; underscores and hyphens are interchangeable
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "one_to_one" => Some(Cardinality::OneToOne),
            "one_to_many" => Some(Cardinality::OneToMany),
            "many_to_one" => Some(Cardinality::ManyToOne),
            "many_to_many" => Some(Cardinality::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::OneToOne => "one_to_one",
            Cardinality::OneToMany => "one_to_many",
            Cardinality::ManyToOne => "many_to_one",
            Cardinality::ManyToMany => "many_to_many",
        }
    }
}

/// A resolved relationship endpoint.
///
/// The names are the canonical spelling of the resolved field; `handle` is
/// what later stages use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Endpoint {
    pub entity: String,
    pub field: String,
    #[serde(skip)]
    pub handle: FieldRef,
}

impl Endpoint {
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.entity, self.field)
    }
}

/// A relationship whose endpoints both resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relationship {
    pub name: String,
    pub from: Endpoint,
    pub to: Endpoint,
    pub cardinality: Cardinality,
    pub description: Option<String>,
}

impl Relationship {
    /// `(from, to)` entity handles
    pub fn entity_pair(&self) -> (EntityId, EntityId) {
        (self.from.handle.entity, self.to.handle.entity)
    }
}

/// Edge implied by a fact table's `dimension_refs`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedEdge {
    pub fact: String,
    pub dimension: String,
    #[serde(skip)]
    pub fact_id: EntityId,
    #[serde(skip)]
    pub dimension_id: EntityId,
}
