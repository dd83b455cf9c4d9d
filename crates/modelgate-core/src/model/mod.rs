//! Canonical model
//!
//! The canonical model is the fully resolved form of a model document.
//! Entities live in an arena (`Model::entities`); every `Entity.field`
//! reference found in the document is resolved once by the builder into a
//! [`FieldRef`] handle, and later stages work on handles only.
//!
//! Models are immutable once built. There is no mutation API: documents are
//! edited at the document level (see [`crate::ops`]) and rebuilt.

pub mod entity;
pub mod governance;
pub mod index;
pub mod metric;
pub mod relationship;

pub use entity::{Entity, EntityKind, Field};
pub use governance::{Classification, GlossaryTerm, Governance, Steward};
pub use index::Index;
pub use metric::Metric;
pub use relationship::{Cardinality, DerivedEdge, Endpoint, Relationship};

use serde::Serialize;
use std::collections::HashMap;

/// Handle of an entity in the model arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    /// Position of the entity in declaration order
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle of a field: owning entity plus position within its field list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FieldRef {
    pub entity: EntityId,
    pub field: usize,
}

/// A field name as written in the document together with its resolution.
///
/// `handle` is `None` when the name did not resolve; the validator reports
/// such slots instead of the builder failing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSlot {
    pub name: String,
    #[serde(skip)]
    pub handle: Option<FieldRef>,
}

impl FieldSlot {
    pub fn is_resolved(&self) -> bool {
        self.handle.is_some()
    }
}

/// Lifecycle state of a model document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    #[default]
    Draft,
    Approved,
    Deprecated,
}

impl LifecycleState {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(LifecycleState::Draft),
            "approved" => Some(LifecycleState::Approved),
            "deprecated" => Some(LifecycleState::Deprecated),
            _ => None,
        }
    }
}

/// The canonical model with its lookup indices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    pub name: String,
    pub version: String,
    pub domain: String,
    pub owners: Vec<String>,
    pub state: LifecycleState,
    pub layer: Option<String>,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub indexes: Vec<Index>,
    pub metrics: Vec<Metric>,
    pub governance: Governance,
    pub glossary: Vec<GlossaryTerm>,
    /// Fact → dimension edges implied by `dimension_refs` and not already
    /// covered by an explicit relationship. Diagram metadata only.
    pub derived_edges: Vec<DerivedEdge>,
    #[serde(skip)]
    pub(crate) entity_by_name: HashMap<String, EntityId>,
    #[serde(skip)]
    pub(crate) field_ref_index: HashMap<String, FieldRef>,
}

impl Model {
    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entity_id(name).and_then(|id| self.entity_at(id))
    }

    /// Resolve an entity name to its handle
    pub fn entity_id(&self, name: &str) -> Option<EntityId> {
        self.entity_by_name.get(name).copied()
    }

    /// Entity for a handle. `None` if the handle was issued by another model
    /// and points past this arena.
    pub fn entity_at(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    /// Resolve a qualified `Entity.field` string
    pub fn resolve_field_ref(&self, qualified: &str) -> Option<FieldRef> {
        self.field_ref_index.get(qualified).copied()
    }

    /// Field for a handle; `None` if the handle does not fit this model
    pub fn field(&self, handle: FieldRef) -> Option<&Field> {
        self.entity_at(handle.entity)?.fields.get(handle.field)
    }

    /// `Entity.field` spelling of a handle
    pub fn qualified_name(&self, handle: FieldRef) -> Option<String> {
        let entity = self.entity_at(handle.entity)?;
        let field = entity.fields.get(handle.field)?;
        Some(format!("{}.{}", entity.name, field.name))
    }

    /// Name → handle index over all entities
    pub fn entity_by_name(&self) -> &HashMap<String, EntityId> {
        &self.entity_by_name
    }

    /// `Entity.field` → handle index over all fields
    pub fn field_ref_index(&self) -> &HashMap<String, FieldRef> {
        &self.field_ref_index
    }

    /// Metric lookup by name (linear; metrics are few)
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Effective sensitivity of a field: governance classification wins over
    /// the field's own label.
    pub fn sensitivity_of(&self, handle: FieldRef) -> Option<&str> {
        self.governance
            .classification_for(handle)
            .or_else(|| self.field(handle)?.sensitivity.as_deref())
    }
}
