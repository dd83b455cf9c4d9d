//! Canonical model builder
//!
//! Turns a loaded [`Document`] into a [`Model`]. Entity and field name
//! uniqueness are fatal; every other defect (unknown kind or state, bad
//! relationship references, malformed secondary sections, repeated metric or
//! index names) degrades with a warning diagnostic so the rest of the model
//! is still available.

mod format;

pub(crate) use format::{coerce_list, coerce_text};

use std::collections::{HashMap, HashSet};

use format::{
    RawEntity, RawField, RawGlossaryTerm, RawGovernance, RawIndex, RawMetric, RawModel,
    RawRelationship,
};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::errors::{ModelError, Result};
use crate::loader::Document;
use crate::model::{
    Cardinality, Classification, DerivedEdge, Endpoint, Entity, EntityId, EntityKind, Field,
    FieldRef, FieldSlot, GlossaryTerm, Governance, Index, LifecycleState, Metric, Model,
    Relationship, Steward,
};

/// Builder result: the model plus warnings in document order
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub model: Model,
    pub warnings: Vec<Diagnostic>,
}

/// Build the canonical model for a loaded document.
///
/// # Errors
///
/// - `ParseError` if the entity list has a shape no coercion can rescue
///   (e.g. `fields` is a string), or an entity/field has no name
/// - `DuplicateEntity` on the first repeated entity name
/// - `DuplicateField` on the first repeated field name within an entity
pub fn build_model(doc: &Document) -> Result<BuildOutput> {
    let raw: RawModel =
        serde_yaml::from_value(doc.as_value().clone()).map_err(|e| ModelError::Parse {
            message: format!("document does not match the model schema: {}", e),
        })?;
    ModelBuilder::default().build(raw)
}

/// Split a reference into `(entity, field)`; exactly one `.` with both
/// sides non-empty.
pub(crate) fn split_ref(reference: &str) -> Option<(&str, &str)> {
    let reference = reference.trim();
    let (entity, field) = reference.split_once('.')?;
    if entity.is_empty() || field.is_empty() || field.contains('.') {
        return None;
    }
    Some((entity, field))
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[derive(Default)]
struct ModelBuilder {
    warnings: Vec<Diagnostic>,
    entity_by_name: HashMap<String, EntityId>,
    field_ref_index: HashMap<String, FieldRef>,
}

impl ModelBuilder {
    fn build(mut self, raw: RawModel) -> Result<BuildOutput> {
        let state = self.state(&raw.name, raw.state.as_deref());

        let mut entities = Vec::with_capacity(raw.entities.len());
        for (position, raw_entity) in raw.entities.into_iter().enumerate() {
            let entity = self.entity(position, raw_entity)?;
            entities.push(entity);
        }

        let raw_relationships: Vec<RawRelationship> = self.section(
            "relationships",
            raw.relationships,
            DiagnosticCode::InvalidRelationshipRef,
        );
        let relationships = raw_relationships
            .into_iter()
            .filter_map(|r| self.relationship(&entities, r))
            .collect::<Vec<_>>();
        let raw_indexes: Vec<RawIndex> =
            self.section("indexes", raw.indexes, DiagnosticCode::InvalidSectionItem);
        let indexes = self.indexes(raw_indexes);
        let raw_metrics: Vec<RawMetric> =
            self.section("metrics", raw.metrics, DiagnosticCode::InvalidSectionItem);
        let metrics = self.metrics(raw_metrics);
        let governance = self.governance(raw.governance);
        let raw_glossary: Vec<RawGlossaryTerm> =
            self.section("glossary", raw.glossary, DiagnosticCode::InvalidSectionItem);
        let glossary = raw_glossary
            .into_iter()
            .map(|g| self.glossary_term(g))
            .collect();
        let derived_edges = derive_edges(&entities, &relationships, &self.entity_by_name);

        let model = Model {
            name: raw.name,
            version: raw.version,
            domain: raw.domain,
            owners: dedup_preserving_order(raw.owners),
            state,
            layer: raw.layer.map(|l| l.to_ascii_lowercase()),
            entities,
            relationships,
            indexes,
            metrics,
            governance,
            glossary,
            derived_edges,
            entity_by_name: self.entity_by_name,
            field_ref_index: self.field_ref_index,
        };
        Ok(BuildOutput {
            model,
            warnings: self.warnings,
        })
    }

    /// Decode a list section item by item. A malformed item is skipped with
    /// `item_code`; a section that is not a list is ignored.
    fn section<T: DeserializeOwned>(
        &mut self,
        section: &str,
        value: Value,
        item_code: DiagnosticCode,
    ) -> Vec<T> {
        let items = match value {
            Value::Null => return Vec::new(),
            Value::Sequence(items) => items,
            _ => {
                tracing::debug!(section, "ignoring non-list section");
                self.warnings.push(Diagnostic::warning(
                    DiagnosticCode::InvalidSectionShape,
                    section,
                    format!("Section '{}' is not a list and was ignored", section),
                ));
                return Vec::new();
            }
        };

        let mut decoded = Vec::with_capacity(items.len());
        for (position, item) in items.into_iter().enumerate() {
            match serde_yaml::from_value::<T>(item) {
                Ok(item) => decoded.push(item),
                Err(e) => {
                    tracing::debug!(section, position, "dropping malformed entry");
                    self.warnings.push(Diagnostic::warning(
                        item_code,
                        format!("{}[{}]", section, position),
                        format!(
                            "Malformed {} entry at position {} was dropped: {}",
                            section, position, e
                        ),
                    ));
                }
            }
        }
        decoded
    }

    fn state(&mut self, model_name: &str, raw: Option<&str>) -> LifecycleState {
        let Some(raw) = raw else {
            return LifecycleState::default();
        };
        LifecycleState::parse(raw).unwrap_or_else(|| {
            self.warnings.push(Diagnostic::warning(
                DiagnosticCode::UnknownModelState,
                model_name,
                format!("Unknown model state '{}', treated as draft", raw),
            ));
            LifecycleState::default()
        })
    }

    fn entity(&mut self, position: usize, raw: RawEntity) -> Result<Entity> {
        if raw.name.is_empty() {
            return Err(ModelError::Parse {
                message: format!("entity at position {} has no name", position),
            }
            .into());
        }
        if self.entity_by_name.contains_key(&raw.name) {
            return Err(ModelError::DuplicateEntity { entity: raw.name }.into());
        }
        let id = EntityId(position);
        self.entity_by_name.insert(raw.name.clone(), id);

        let kind = self.kind(&raw);
        let mut field_by_name = HashMap::with_capacity(raw.fields.len());
        let mut fields = Vec::with_capacity(raw.fields.len());
        for (index, raw_field) in raw.fields.into_iter().enumerate() {
            if raw_field.name.is_empty() {
                return Err(ModelError::Parse {
                    message: format!(
                        "field at position {} of entity {} has no name",
                        index, raw.name
                    ),
                }
                .into());
            }
            if field_by_name.contains_key(&raw_field.name) {
                return Err(ModelError::DuplicateField {
                    entity: raw.name,
                    field: raw_field.name,
                }
                .into());
            }
            field_by_name.insert(raw_field.name.clone(), index);
            self.field_ref_index.insert(
                format!("{}.{}", raw.name, raw_field.name),
                FieldRef {
                    entity: id,
                    field: index,
                },
            );
            fields.push(field(raw_field));
        }

        Ok(Entity {
            name: raw.name,
            kind,
            description: raw.description,
            tags: dedup_preserving_order(raw.tags),
            schema: raw.schema,
            database: raw.database,
            subject_area: raw.subject_area,
            owner: raw.owner,
            sla: raw.sla,
            fields,
            grain: raw.grain,
            surrogate_key: raw.surrogate_key,
            natural_key: raw.natural_key,
            field_by_name,
        })
    }

    fn kind(&mut self, raw: &RawEntity) -> EntityKind {
        let Some(spelled) = raw.kind.as_deref() else {
            return EntityKind::Table;
        };
        match spelled.to_ascii_lowercase().replace('-', "_").as_str() {
            "table" => EntityKind::Table,
            "view" => EntityKind::View,
            "materialized_view" => EntityKind::MaterializedView,
            "external_table" => EntityKind::ExternalTable,
            "snapshot" => EntityKind::Snapshot,
            "fact_table" => EntityKind::FactTable {
                dimension_refs: dedup_preserving_order(raw.dimension_refs.clone()),
            },
            "dimension_table" => EntityKind::DimensionTable {
                scd_type: raw.scd_type,
                conformed: raw.conformed,
            },
            "bridge_table" => EntityKind::BridgeTable,
            _ => {
                self.warnings.push(Diagnostic::warning(
                    DiagnosticCode::UnknownEntityKind,
                    raw.name.as_str(),
                    format!("Unknown entity kind '{}', treated as table", spelled),
                ));
                EntityKind::Table
            }
        }
    }

    fn relationship(&mut self, entities: &[Entity], raw: RawRelationship) -> Option<Relationship> {
        let name = if raw.name.is_empty() {
            format!("{} -> {}", raw.from, raw.to)
        } else {
            raw.name
        };

        let from = self.endpoint(entities, &name, "from", &raw.from)?;
        let to = self.endpoint(entities, &name, "to", &raw.to)?;

        let spelled = raw.cardinality.unwrap_or_default();
        let Some(cardinality) = Cardinality::parse(&spelled) else {
            tracing::debug!(relationship = %name, cardinality = %spelled, "dropping relationship");
            self.warnings.push(Diagnostic::warning(
                DiagnosticCode::InvalidRelationshipCardinality,
                name.as_str(),
                format!(
                    "Relationship '{}' has invalid cardinality '{}'",
                    name, spelled
                ),
            ));
            return None;
        };

        Some(Relationship {
            name,
            from,
            to,
            cardinality,
            description: raw.description,
        })
    }

    fn endpoint(
        &mut self,
        entities: &[Entity],
        relationship: &str,
        side: &str,
        reference: &str,
    ) -> Option<Endpoint> {
        let Some((entity, field)) = split_ref(reference) else {
            tracing::debug!(relationship, side, reference, "dropping relationship");
            self.warnings.push(Diagnostic::warning(
                DiagnosticCode::InvalidRelationshipRef,
                relationship,
                format!(
                    "Relationship '{}' has malformed {} reference '{}' (expected Entity.field)",
                    relationship, side, reference
                ),
            ));
            return None;
        };

        let Some(&entity_id) = self.entity_by_name.get(entity) else {
            tracing::debug!(relationship, side, reference, "dropping relationship");
            self.warnings.push(Diagnostic::warning(
                DiagnosticCode::RelationshipMissingEntity,
                relationship,
                format!(
                    "Relationship '{}' references missing entity '{}'",
                    relationship, entity
                ),
            ));
            return None;
        };

        let Some(index) = entities[entity_id.0].field_index(field) else {
            tracing::debug!(relationship, side, reference, "dropping relationship");
            self.warnings.push(Diagnostic::warning(
                DiagnosticCode::InvalidRelationshipRef,
                relationship,
                format!(
                    "Relationship '{}' references missing field '{}.{}'",
                    relationship, entity, field
                ),
            ));
            return None;
        };

        Some(Endpoint {
            entity: entity.to_string(),
            field: field.to_string(),
            handle: FieldRef {
                entity: entity_id,
                field: index,
            },
        })
    }

    fn slot(&self, entity: &str, field: String) -> FieldSlot {
        let handle = self
            .field_ref_index
            .get(&format!("{}.{}", entity, field))
            .copied();
        FieldSlot {
            name: field,
            handle,
        }
    }

    fn qualified_slot(&self, reference: String) -> FieldSlot {
        let handle = self.field_ref_index.get(reference.trim()).copied();
        FieldSlot {
            name: reference,
            handle,
        }
    }

    /// First occurrence of each `(entity, name)` pair wins
    fn indexes(&mut self, raw: Vec<RawIndex>) -> Vec<Index> {
        let mut seen = HashSet::new();
        let mut indexes = Vec::with_capacity(raw.len());
        for index in raw {
            if !seen.insert((index.entity.clone(), index.name.clone())) {
                let path = format!("{}.{}", index.entity, index.name);
                self.warnings.push(Diagnostic::warning(
                    DiagnosticCode::DuplicateIndex,
                    path.as_str(),
                    format!("Index '{}' is declared more than once; first kept", path),
                ));
                continue;
            }
            indexes.push(self.index(index));
        }
        indexes
    }

    fn index(&self, raw: RawIndex) -> Index {
        let fields = raw
            .fields
            .into_iter()
            .map(|f| self.slot(&raw.entity, f))
            .collect();
        Index {
            entity_id: self.entity_by_name.get(&raw.entity).copied(),
            name: raw.name,
            entity: raw.entity,
            fields,
            unique: raw.unique,
            kind: raw.kind,
        }
    }

    /// First occurrence of each metric name wins
    fn metrics(&mut self, raw: Vec<RawMetric>) -> Vec<Metric> {
        let mut seen = HashSet::new();
        let mut metrics = Vec::with_capacity(raw.len());
        for metric in raw {
            if !seen.insert(metric.name.clone()) {
                self.warnings.push(Diagnostic::warning(
                    DiagnosticCode::DuplicateMetric,
                    metric.name.as_str(),
                    format!(
                        "Metric '{}' is declared more than once; first kept",
                        metric.name
                    ),
                ));
                continue;
            }
            metrics.push(self.metric(metric));
        }
        metrics
    }

    fn metric(&self, raw: RawMetric) -> Metric {
        let dimensions = raw
            .dimensions
            .into_iter()
            .map(|d| self.slot(&raw.entity, d))
            .collect();
        let time_dimension = raw.time_dimension.map(|t| self.slot(&raw.entity, t));
        Metric {
            entity_id: self.entity_by_name.get(&raw.entity).copied(),
            name: raw.name,
            entity: raw.entity,
            expression: raw.expression,
            aggregation: raw.aggregation.to_ascii_lowercase(),
            grain: raw.grain,
            dimensions,
            time_dimension,
            description: raw.description,
            tags: dedup_preserving_order(raw.tags),
        }
    }

    fn governance(&mut self, value: Value) -> Governance {
        let raw = if value.is_null() {
            RawGovernance::default()
        } else {
            serde_yaml::from_value::<RawGovernance>(value).unwrap_or_else(|e| {
                self.warnings.push(Diagnostic::warning(
                    DiagnosticCode::InvalidSectionShape,
                    "governance",
                    format!("Section 'governance' is malformed and was ignored: {}", e),
                ));
                RawGovernance::default()
            })
        };
        Governance {
            classification: self.classification(&raw.classification),
            stewards: stewards(&raw.stewards),
        }
    }

    fn classification(&self, raw: &Mapping) -> Vec<Classification> {
        raw.iter()
            .map(|(key, label)| {
                let key = coerce_text(key);
                Classification {
                    target: self.field_ref_index.get(&key).copied(),
                    key,
                    label: coerce_text(label),
                }
            })
            .collect()
    }

    fn glossary_term(&self, raw: RawGlossaryTerm) -> GlossaryTerm {
        GlossaryTerm {
            term: raw.term,
            definition: raw.definition,
            abbreviation: raw.abbreviation,
            related_fields: raw
                .related_fields
                .into_iter()
                .map(|r| self.qualified_slot(r))
                .collect(),
        }
    }
}

fn field(raw: RawField) -> Field {
    Field {
        nullable: !raw.primary_key && raw.nullable.unwrap_or(true),
        name: raw.name,
        data_type: raw.data_type,
        primary_key: raw.primary_key,
        unique: raw.unique,
        foreign_key: raw.foreign_key,
        sensitivity: raw.sensitivity,
        computed: raw.computed,
        check: raw.check,
        default: raw.default,
        description: raw.description,
        deprecated: raw.deprecated,
    }
}

fn stewards(raw: &Mapping) -> Vec<Steward> {
    raw.iter()
        .map(|(scope, owner)| Steward {
            scope: coerce_text(scope),
            owner: coerce_text(owner),
        })
        .collect()
}

/// Fact → dimension edges not already joined by an explicit relationship.
/// Unknown dimension names are skipped.
fn derive_edges(
    entities: &[Entity],
    relationships: &[Relationship],
    entity_by_name: &HashMap<String, EntityId>,
) -> Vec<DerivedEdge> {
    let joined: HashSet<(EntityId, EntityId)> = relationships
        .iter()
        .flat_map(|r| {
            let (from, to) = r.entity_pair();
            [(from, to), (to, from)]
        })
        .collect();

    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    for (position, fact) in entities.iter().enumerate() {
        let fact_id = EntityId(position);
        for dimension in fact.kind.dimension_refs() {
            let Some(&dimension_id) = entity_by_name.get(dimension) else {
                tracing::debug!(fact = %fact.name, dimension = %dimension, "skipping unknown dimension ref");
                continue;
            };
            if joined.contains(&(fact_id, dimension_id)) {
                continue;
            }
            if seen.insert((fact_id, dimension_id)) {
                edges.push(DerivedEdge {
                    fact: fact.name.clone(),
                    dimension: dimension.clone(),
                    fact_id,
                    dimension_id,
                });
            }
        }
    }
    edges
}
