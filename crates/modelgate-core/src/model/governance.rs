use serde::Serialize;

use super::{FieldRef, FieldSlot};

/// Sensitivity label attached to an `Entity.field` key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Key exactly as written in the document
    pub key: String,
    pub label: String,
    #[serde(skip)]
    pub target: Option<FieldRef>,
}

/// Owner identity responsible for a schema or domain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Steward {
    pub scope: String,
    pub owner: String,
}

/// Governance metadata in declaration order
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Governance {
    pub classification: Vec<Classification>,
    pub stewards: Vec<Steward>,
}

impl Governance {
    /// Label assigned to a resolved field, if any
    pub fn classification_for(&self, handle: FieldRef) -> Option<&str> {
        self.classification
            .iter()
            .find(|c| c.target == Some(handle))
            .map(|c| c.label.as_str())
    }

    pub fn steward_for(&self, scope: &str) -> Option<&str> {
        self.stewards
            .iter()
            .find(|s| s.scope == scope)
            .map(|s| s.owner.as_str())
    }
}

/// Business glossary entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
    pub abbreviation: Option<String>,
    /// `Entity.field` references; unresolved slots keep their raw text
    pub related_fields: Vec<FieldSlot>,
}
