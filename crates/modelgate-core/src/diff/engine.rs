//! Model diff computation engine.
//!
//! The core entry point is [`compute_diff`], which compares two canonical
//! models. [`diff_models`] wraps it for callers holding build results that
//! may have failed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use crate::diff::model::{
    DiffClassification, DiffIdentity, DiffSummary, EntityChange, EntityChanges,
    FieldAttributeChange, FieldChange, IndexChange, IndexChanges, IndexKey, MetricChange,
    MetricSetChanges, ModelDiff, RelationshipChanges, RelationshipKey,
};
use crate::model::{Entity, Field, Index, Metric, Model, Relationship};

/// Result of diffing two possibly-invalid build results.
///
/// `Unavailable` carries which side failed; callers prefix it with their
/// own "cannot diff/gate an invalid model" wording.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DiffOutcome {
    Computed(ModelDiff),
    /// One side has no canonical model
    Unavailable { reason: String },
}

impl DiffOutcome {
    pub fn diff(&self) -> Option<&ModelDiff> {
        match self {
            DiffOutcome::Computed(diff) => Some(diff),
            DiffOutcome::Unavailable { .. } => None,
        }
    }

    pub fn into_diff(self) -> Option<ModelDiff> {
        match self {
            DiffOutcome::Computed(diff) => Some(diff),
            DiffOutcome::Unavailable { .. } => None,
        }
    }
}

/// Diff two build results. Never fails: a missing side yields
/// [`DiffOutcome::Unavailable`].
pub fn diff_models(old: Option<&Model>, new: Option<&Model>) -> DiffOutcome {
    match (old, new) {
        (Some(old), Some(new)) => DiffOutcome::Computed(compute_diff(old, new)),
        (None, Some(_)) => unavailable("baseline"),
        (Some(_), None) => unavailable("current revision"),
        (None, None) => unavailable("baseline and current revision"),
    }
}

fn unavailable(side: &str) -> DiffOutcome {
    DiffOutcome::Unavailable {
        reason: format!("{} failed to build", side),
    }
}

/// SHA-256 of the canonical JSON form of a model; `None` if the model
/// cannot be serialized
pub fn model_digest(model: &Model) -> Option<String> {
    let canonical = serde_json::to_string(model).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Some(hex::encode(hasher.finalize()))
}

/// Compute the structural diff from `old` to `new`.
///
/// Breaking changes are not classified here; the returned diff has an
/// empty `breaking_changes` list.
pub fn compute_diff(old: &Model, new: &Model) -> ModelDiff {
    let (old_digest, new_digest) = (model_digest(old), model_digest(new));
    let same_digest = old_digest.is_some() && old_digest == new_digest;
    let identity = DiffIdentity {
        old_digest: old_digest.unwrap_or_default(),
        new_digest: new_digest.unwrap_or_default(),
    };
    if same_digest {
        return ModelDiff {
            identity,
            ..ModelDiff::default()
        };
    }

    let entities = diff_entities(old, new);
    let relationships = diff_relationships(&old.relationships, &new.relationships);
    let indexes = diff_indexes(&old.indexes, &new.indexes);
    let (metrics, changed_metrics) = diff_metrics(&old.metrics, &new.metrics);

    let summary = DiffSummary {
        added_entities: entities.added.len(),
        removed_entities: entities.removed.len(),
        changed_entities: entities.changed.len(),
        added_relationships: relationships.added.len(),
        removed_relationships: relationships.removed.len(),
        added_indexes: indexes.added.len(),
        removed_indexes: indexes.removed.len(),
        changed_indexes: indexes.changed.len(),
        added_metrics: metrics.added.len(),
        removed_metrics: metrics.removed.len(),
        changed_metrics: changed_metrics.len(),
        breaking_change_count: 0,
    };

    ModelDiff {
        identity,
        classification: DiffClassification::Changed,
        entities,
        relationships,
        indexes,
        metrics,
        changed_metrics,
        breaking_changes: Vec::new(),
        summary,
    }
}

/// Declared types compare case- and whitespace-insensitively
fn normalize_type(data_type: &str) -> String {
    data_type
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn diff_entities(old: &Model, new: &Model) -> EntityChanges {
    let removed = old
        .entities
        .iter()
        .filter(|e| new.entity(&e.name).is_none())
        .map(|e| e.name.clone())
        .collect();

    let mut added = Vec::new();
    let mut changed = Vec::new();
    for entity in &new.entities {
        match old.entity(&entity.name) {
            None => added.push(entity.name.clone()),
            Some(previous) => {
                if let Some(change) = diff_entity(previous, entity) {
                    changed.push(change);
                }
            }
        }
    }

    EntityChanges {
        added,
        removed,
        changed,
    }
}

fn diff_entity(old: &Entity, new: &Entity) -> Option<EntityChange> {
    let added_fields: Vec<String> = new
        .fields
        .iter()
        .filter(|f| !old.has_field(&f.name))
        .map(|f| f.name.clone())
        .collect();
    let removed_fields: Vec<String> = old
        .fields
        .iter()
        .filter(|f| !new.has_field(&f.name))
        .map(|f| f.name.clone())
        .collect();
    let changed_fields: Vec<FieldChange> = new
        .fields
        .iter()
        .filter_map(|f| old.field(&f.name).and_then(|previous| diff_field(previous, f)))
        .collect();

    if added_fields.is_empty() && removed_fields.is_empty() && changed_fields.is_empty() {
        return None;
    }
    Some(EntityChange {
        entity: new.name.clone(),
        added_fields,
        removed_fields,
        changed_fields,
    })
}

fn diff_field(old: &Field, new: &Field) -> Option<FieldChange> {
    let mut changes = Vec::new();
    if normalize_type(&old.data_type) != normalize_type(&new.data_type) {
        changes.push(FieldAttributeChange::Type {
            old: old.data_type.clone(),
            new: new.data_type.clone(),
        });
    }
    if old.nullable != new.nullable {
        changes.push(FieldAttributeChange::Nullable {
            old: old.nullable,
            new: new.nullable,
        });
    }
    if old.primary_key != new.primary_key {
        changes.push(FieldAttributeChange::PrimaryKey {
            old: old.primary_key,
            new: new.primary_key,
        });
    }
    if old.unique != new.unique {
        changes.push(FieldAttributeChange::Unique {
            old: old.unique,
            new: new.unique,
        });
    }
    if old.foreign_key != new.foreign_key {
        changes.push(FieldAttributeChange::ForeignKey {
            old: old.foreign_key,
            new: new.foreign_key,
        });
    }

    if changes.is_empty() {
        None
    } else {
        Some(FieldChange {
            field: new.name.clone(),
            changes,
        })
    }
}

fn relationship_key(relationship: &Relationship) -> RelationshipKey {
    RelationshipKey {
        name: relationship.name.clone(),
        from: relationship.from.qualified(),
        to: relationship.to.qualified(),
        cardinality: relationship.cardinality.as_str().to_string(),
    }
}

fn diff_relationships(old: &[Relationship], new: &[Relationship]) -> RelationshipChanges {
    let old_keys: Vec<RelationshipKey> = old.iter().map(relationship_key).collect();
    let new_keys: Vec<RelationshipKey> = new.iter().map(relationship_key).collect();
    let old_set: HashSet<&RelationshipKey> = old_keys.iter().collect();
    let new_set: HashSet<&RelationshipKey> = new_keys.iter().collect();

    RelationshipChanges {
        added: new_keys
            .iter()
            .filter(|k| !old_set.contains(k))
            .cloned()
            .collect(),
        removed: old_keys
            .iter()
            .filter(|k| !new_set.contains(k))
            .cloned()
            .collect(),
    }
}

fn index_key(index: &Index) -> IndexKey {
    IndexKey {
        entity: index.entity.clone(),
        name: index.name.clone(),
    }
}

fn diff_indexes(old: &[Index], new: &[Index]) -> IndexChanges {
    let old_by_key: HashMap<IndexKey, &Index> = old.iter().map(|i| (index_key(i), i)).collect();
    let new_keys: HashSet<IndexKey> = new.iter().map(index_key).collect();

    let removed = old
        .iter()
        .map(index_key)
        .filter(|k| !new_keys.contains(k))
        .collect();

    let mut added = Vec::new();
    let mut changed = Vec::new();
    for index in new {
        let key = index_key(index);
        match old_by_key.get(&key) {
            None => added.push(key),
            Some(previous) => {
                let mut changed_fields = Vec::new();
                if previous.field_names() != index.field_names() {
                    changed_fields.push("fields".to_string());
                }
                if previous.unique != index.unique {
                    changed_fields.push("unique".to_string());
                }
                if !changed_fields.is_empty() {
                    changed.push(IndexChange {
                        entity: key.entity,
                        name: key.name,
                        changed_fields,
                    });
                }
            }
        }
    }

    IndexChanges {
        added,
        removed,
        changed,
    }
}

fn diff_metrics(old: &[Metric], new: &[Metric]) -> (MetricSetChanges, Vec<MetricChange>) {
    let old_by_name: HashMap<&str, &Metric> = old.iter().map(|m| (m.name.as_str(), m)).collect();
    let new_names: HashSet<&str> = new.iter().map(|m| m.name.as_str()).collect();

    let removed = old
        .iter()
        .filter(|m| !new_names.contains(m.name.as_str()))
        .map(|m| m.name.clone())
        .collect();

    let mut added = Vec::new();
    let mut changed = Vec::new();
    for metric in new {
        match old_by_name.get(metric.name.as_str()) {
            None => added.push(metric.name.clone()),
            Some(previous) => {
                let changed_fields = metric_contract_changes(previous, metric);
                if !changed_fields.is_empty() {
                    changed.push(MetricChange {
                        metric: metric.name.clone(),
                        changed_fields,
                    });
                }
            }
        }
    }

    (MetricSetChanges { added, removed }, changed)
}

fn metric_contract_changes(old: &Metric, new: &Metric) -> Vec<String> {
    let checks = [
        ("expression", old.expression != new.expression),
        ("aggregation", old.aggregation != new.aggregation),
        ("grain", old.grain != new.grain),
        ("dimensions", old.dimension_names() != new.dimension_names()),
        (
            "time_dimension",
            old.time_dimension_name() != new.time_dimension_name(),
        ),
    ];
    checks
        .into_iter()
        .filter(|(_, differs)| *differs)
        .map(|(name, _)| name.to_string())
        .collect()
}
