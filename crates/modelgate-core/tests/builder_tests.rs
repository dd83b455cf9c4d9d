#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{edit, model, SALES};
use modelgate_core::model::{Cardinality, LifecycleState};
use modelgate_core::{build_from_text, validate, DiagnosticCode, EntityKind, ExErrorKind};

#[test]
fn test_sales_model_is_fully_resolved() {
    let m = model(SALES);
    assert_eq!(m.name, "sales");
    assert_eq!(m.state, LifecycleState::Approved);
    assert_eq!(m.layer.as_deref(), Some("report"));
    assert_eq!(m.entities.len(), 3);
    assert_eq!(m.entity_by_name().len(), 3);

    let customers = m.entity("customers").unwrap();
    assert_eq!(
        customers.kind,
        EntityKind::DimensionTable {
            scd_type: Some(2),
            conformed: true
        }
    );

    let rel = &m.relationships[0];
    assert_eq!(rel.cardinality, Cardinality::ManyToOne);
    assert_eq!(
        m.qualified_name(rel.from.handle).as_deref(),
        Some("orders.customer_id")
    );
    assert_eq!(
        m.qualified_name(rel.to.handle).as_deref(),
        Some("customers.customer_id")
    );

    let revenue = m.metric("revenue").unwrap();
    assert!(revenue.dimensions.iter().all(|d| d.is_resolved()));
    assert!(revenue.time_dimension.as_ref().unwrap().is_resolved());
}

#[test]
fn test_derived_edges_skip_explicit_relationships() {
    let m = model(SALES);
    let edges: Vec<_> = m
        .derived_edges
        .iter()
        .map(|e| (e.fact.as_str(), e.dimension.as_str()))
        .collect();
    assert_eq!(edges, vec![("orders", "dates")]);
}

#[test]
fn test_governance_label_overrides_field_sensitivity() {
    let text = edit(
        SALES,
        "{name: email, type: varchar(255), unique: true}",
        "{name: email, type: varchar(255), unique: true, sensitivity: internal}",
    );
    let m = model(&text);
    let email = m.resolve_field_ref("customers.email").unwrap();
    assert_eq!(m.sensitivity_of(email), Some("pii"));
    let region = m.resolve_field_ref("customers.region").unwrap();
    assert_eq!(m.sensitivity_of(region), None);
    assert_eq!(m.governance.steward_for("commerce"), Some("alice@example.com"));
}

#[test]
fn test_heterogeneous_scalars_are_coerced() {
    let text = r#"
name: coerced
version: 2
owners: solo-owner
entities:
  - name: t
    description: [first, second]
    sla: 24
    tags: single
    grain: id
    fields:
      - {name: id, type: integer, default: 0, check: true}
"#;
    let m = model(text);
    assert_eq!(m.version, "2");
    assert_eq!(m.owners, vec!["solo-owner"]);
    let t = &m.entities[0];
    assert_eq!(t.description, "first, second");
    assert_eq!(t.sla.as_deref(), Some("24"));
    assert_eq!(t.tags, vec!["single"]);
    assert_eq!(t.grain, vec!["id"]);
    let id = t.field("id").unwrap();
    assert_eq!(id.default.as_deref(), Some("0"));
    assert_eq!(id.check.as_deref(), Some("true"));
}

#[test]
fn test_bad_relationships_are_dropped_with_warnings() {
    let text = r#"
name: rels
entities:
  - name: a
    fields: [{name: id}]
  - name: b
    fields: [{name: a_id}]
relationships:
  - {name: malformed, from: b, to: a.id, cardinality: many_to_one}
  - {name: no_entity, from: b.a_id, to: c.id, cardinality: many_to_one}
  - {name: no_field, from: b.missing, to: a.id, cardinality: many_to_one}
  - {name: bad_card, from: b.a_id, to: a.id, cardinality: several}
  - {name: good, from: b.a_id, to: a.id, cardinality: many-to-one}
"#;
    let built = build_from_text(text).unwrap();
    let warnings: Vec<_> = built
        .warnings
        .iter()
        .map(|w| (w.code, w.path.as_str()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (DiagnosticCode::InvalidRelationshipRef, "malformed"),
            (DiagnosticCode::RelationshipMissingEntity, "no_entity"),
            (DiagnosticCode::InvalidRelationshipRef, "no_field"),
            (DiagnosticCode::InvalidRelationshipCardinality, "bad_card"),
        ]
    );
    assert_eq!(built.model.relationships.len(), 1);
    assert_eq!(built.model.relationships[0].name, "good");
}

#[test]
fn test_kind_specific_attributes_only_on_matching_kind() {
    let text = r#"
entities:
  - name: plain
    dimension_refs: [other]
    scd_type: 2
  - name: other
    kind: fact_table
    dimension_refs: [plain, plain]
"#;
    let m = model(text);
    assert_eq!(m.entities[0].kind, EntityKind::Table);
    assert_eq!(m.entities[1].kind.dimension_refs(), &["plain".to_string()]);
    assert_eq!(m.derived_edges.len(), 1);
}

#[test]
fn test_duplicate_names_carry_context() {
    let err = build_from_text("entities:\n  - name: a\n    fields: [{name: x}, {name: x}]\n")
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateField);
    assert_eq!(err.entity(), Some("a"));
    assert_eq!(err.field(), Some("x"));
}

#[test]
fn test_unmatchable_section_shape_is_parse_error() {
    let err = build_from_text("entities:\n  - name: a\n    fields: not-a-list\n").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ParseError);
    assert!(err.message().contains("does not match the model schema"));
}

#[test]
fn test_malformed_section_items_are_dropped_with_warnings() {
    let text = r#"
name: shapes
entities:
  - name: a
    fields: [{name: id}]
relationships:
  - a.id -> a.id
  - {name: self_ref, from: a.id, to: a.id, cardinality: one_to_one}
indexes:
  - ix_a
  - {name: ix_id, entity: a, fields: [id]}
metrics:
  - 42
  - {name: total, entity: a, expression: count(id)}
glossary:
  - loose words
"#;
    let built = build_from_text(text).unwrap();
    let warnings: Vec<_> = built
        .warnings
        .iter()
        .map(|w| (w.code, w.path.as_str()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (DiagnosticCode::InvalidRelationshipRef, "relationships[0]"),
            (DiagnosticCode::InvalidSectionItem, "indexes[0]"),
            (DiagnosticCode::InvalidSectionItem, "metrics[0]"),
            (DiagnosticCode::InvalidSectionItem, "glossary[0]"),
        ]
    );
    let m = &built.model;
    assert_eq!(m.relationships.len(), 1);
    assert_eq!(m.indexes.len(), 1);
    assert_eq!(m.metrics[0].name, "total");
    assert!(m.glossary.is_empty());

    let report = validate(text);
    assert!(report.model.is_some());
    assert!(!report.has_errors);
}

#[test]
fn test_non_list_sections_are_ignored_with_warnings() {
    let text = r#"
entities:
  - name: a
    fields: [{name: id}]
relationships: {from: a.id, to: a.id}
indexes: ix_a
governance: [pii]
"#;
    let built = build_from_text(text).unwrap();
    let warnings: Vec<_> = built
        .warnings
        .iter()
        .map(|w| (w.code, w.path.as_str()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (DiagnosticCode::InvalidSectionShape, "relationships"),
            (DiagnosticCode::InvalidSectionShape, "indexes"),
            (DiagnosticCode::InvalidSectionShape, "governance"),
        ]
    );
    assert!(built.model.relationships.is_empty());
    assert!(built.model.indexes.is_empty());
    assert!(built.model.governance.classification.is_empty());
}

#[test]
fn test_repeated_metric_and_index_names_keep_first() {
    let text = r#"
entities:
  - name: a
    fields: [{name: x}]
indexes:
  - {name: ix, entity: a, fields: [x]}
  - {name: ix, entity: a, fields: [x], unique: true}
metrics:
  - {name: rev, entity: a, expression: sum(x)}
  - {name: rev, entity: a, expression: count(x)}
"#;
    let built = build_from_text(text).unwrap();
    let warnings: Vec<_> = built
        .warnings
        .iter()
        .map(|w| (w.code, w.path.as_str()))
        .collect();
    assert_eq!(
        warnings,
        vec![
            (DiagnosticCode::DuplicateIndex, "a.ix"),
            (DiagnosticCode::DuplicateMetric, "rev"),
        ]
    );
    assert_eq!(built.model.indexes.len(), 1);
    assert!(!built.model.indexes[0].unique);
    assert_eq!(built.model.metrics.len(), 1);
    assert_eq!(built.model.metrics[0].expression, "sum(x)");
}

#[test]
fn test_relationship_in_either_direction_suppresses_derived_edge() {
    let text = r#"
entities:
  - name: f
    kind: fact_table
    dimension_refs: [d, e]
    fields: [{name: d_id}]
  - name: d
    fields: [{name: id}]
  - name: e
relationships:
  - {name: d_f, from: d.id, to: f.d_id, cardinality: one_to_many}
"#;
    let m = model(text);
    let edges: Vec<_> = m
        .derived_edges
        .iter()
        .map(|e| (e.fact.as_str(), e.dimension.as_str()))
        .collect();
    assert_eq!(edges, vec![("f", "e")]);
}

#[test]
fn test_handles_from_another_model_do_not_resolve() {
    let sales = model(SALES);
    let small = model("entities:\n  - name: t\n    fields: [{name: id}]\n");

    let date_key = sales.resolve_field_ref("dates.date_key").unwrap();
    assert!(small.entity_at(date_key.entity).is_none());
    assert!(small.field(date_key).is_none());
    assert_eq!(small.qualified_name(date_key), None);
    assert_eq!(small.sensitivity_of(date_key), None);

    let region = sales.resolve_field_ref("customers.region").unwrap();
    assert!(small.entity_at(region.entity).is_some());
    assert!(small.field(region).is_none());
}
