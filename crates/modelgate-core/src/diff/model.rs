//! Model diff output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections are `Vec` in declaration order: removed items follow the
//! baseline, added and changed items follow the current revision.

use serde::{Deserialize, Serialize};

/// The structured diff between two canonical models.
///
/// Every category is populated even when empty so consumers can process
/// the diff uniformly. `breaking_changes` stays empty until the diff has
/// been classified (see [`crate::gate::classify`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelDiff {
    /// Content digests of both sides
    pub identity: DiffIdentity,
    pub classification: DiffClassification,
    pub entities: EntityChanges,
    pub relationships: RelationshipChanges,
    pub indexes: IndexChanges,
    pub metrics: MetricSetChanges,
    /// Metrics present on both sides whose contract differs
    pub changed_metrics: Vec<MetricChange>,
    /// Stable human-readable breaking-change descriptions
    pub breaking_changes: Vec<String>,
    pub summary: DiffSummary,
}

impl ModelDiff {
    pub fn is_identical(&self) -> bool {
        self.classification == DiffClassification::Identical
    }

    pub fn has_breaking_changes(&self) -> bool {
        !self.breaking_changes.is_empty()
    }
}

/// SHA-256 digests (hex) of the canonical JSON form of each model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiffIdentity {
    pub old_digest: String,
    pub new_digest: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiffClassification {
    /// Both models have the same canonical content
    #[default]
    Identical,
    Changed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EntityChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub changed: Vec<EntityChange>,
}

/// Field-level changes of an entity present on both sides
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntityChange {
    pub entity: String,
    pub added_fields: Vec<String>,
    pub removed_fields: Vec<String>,
    pub changed_fields: Vec<FieldChange>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldChange {
    pub field: String,
    pub changes: Vec<FieldAttributeChange>,
}

/// One attribute of a field with its old and new value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "attribute", rename_all = "snake_case")]
pub enum FieldAttributeChange {
    Type { old: String, new: String },
    Nullable { old: bool, new: bool },
    PrimaryKey { old: bool, new: bool },
    Unique { old: bool, new: bool },
    ForeignKey { old: bool, new: bool },
}

/// Relationship identity: `(name, from, to, cardinality)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RelationshipKey {
    pub name: String,
    pub from: String,
    pub to: String,
    pub cardinality: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RelationshipChanges {
    pub added: Vec<RelationshipKey>,
    pub removed: Vec<RelationshipKey>,
}

/// Index identity: `(entity, name)`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub entity: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexChange {
    pub entity: String,
    pub name: String,
    /// `fields` and/or `unique`
    pub changed_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IndexChanges {
    pub added: Vec<IndexKey>,
    pub removed: Vec<IndexKey>,
    pub changed: Vec<IndexChange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MetricSetChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// A metric whose contract changed.
///
/// `changed_fields` lists the differing attributes in the fixed order
/// `expression`, `aggregation`, `grain`, `dimensions`, `time_dimension`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricChange {
    pub metric: String,
    pub changed_fields: Vec<String>,
}

/// Per-category counts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffSummary {
    pub added_entities: usize,
    pub removed_entities: usize,
    pub changed_entities: usize,
    pub added_relationships: usize,
    pub removed_relationships: usize,
    pub added_indexes: usize,
    pub removed_indexes: usize,
    pub changed_indexes: usize,
    pub added_metrics: usize,
    pub removed_metrics: usize,
    pub changed_metrics: usize,
    pub breaking_change_count: usize,
}

impl DiffSummary {
    /// Total number of structural changes, breaking or not
    pub fn total_changes(&self) -> usize {
        self.added_entities
            + self.removed_entities
            + self.changed_entities
            + self.added_relationships
            + self.removed_relationships
            + self.added_indexes
            + self.removed_indexes
            + self.changed_indexes
            + self.added_metrics
            + self.removed_metrics
            + self.changed_metrics
    }
}
