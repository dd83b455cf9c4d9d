//! Structural diff scenarios over the sales fixture.
//!
//! All tests build both revisions from text; no I/O.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{edit, model, SALES};
use modelgate_core::diff::model::{DiffClassification, FieldAttributeChange, IndexKey};
use modelgate_core::{compute_diff, diff, DiffOutcome};

#[test]
fn test_self_diff_is_identical_and_empty() {
    let m = model(SALES);
    let d = compute_diff(&m, &m);
    assert_eq!(d.classification, DiffClassification::Identical);
    assert_eq!(d.identity.old_digest, d.identity.new_digest);
    assert_eq!(d.summary.total_changes(), 0);
    assert_eq!(d.summary.breaking_change_count, 0);
    assert!(d.entities.changed.is_empty());
    assert!(d.changed_metrics.is_empty());
}

#[test]
fn test_entity_added_and_removed_in_declaration_order() {
    let old = model(SALES);
    let text = edit(
        SALES,
        "  - name: dates\n    kind: dimension_table\n    grain: [date_key]\n    fields:\n      - {name: date_key, type: date, primary_key: true}\n",
        "  - name: stores\n    fields:\n      - {name: store_id}\n  - name: channels\n    fields:\n      - {name: channel_id}\n",
    );
    let new = model(&text);
    let d = compute_diff(&old, &new);
    assert_eq!(d.classification, DiffClassification::Changed);
    assert_eq!(d.entities.added, vec!["stores", "channels"]);
    assert_eq!(d.entities.removed, vec!["dates"]);
    assert_eq!(d.summary.added_entities, 2);
    assert_eq!(d.summary.removed_entities, 1);
}

#[test]
fn test_field_attribute_changes_are_recorded() {
    let old = model(SALES);
    let text = edit(
        SALES,
        "{name: amount, type: \"decimal(12,2)\"}",
        "{name: amount, type: bigint, nullable: false}",
    );
    let text = edit(&text, "      - {name: note, type: text}\n", "");
    let text = edit(
        &text,
        "{name: region, type: varchar(32)}",
        "{name: region, type: VARCHAR( 32 )}",
    );
    let new = model(&text);
    let d = compute_diff(&old, &new);

    assert_eq!(d.entities.changed.len(), 1);
    let orders = &d.entities.changed[0];
    assert_eq!(orders.entity, "orders");
    assert_eq!(orders.removed_fields, vec!["note"]);
    assert_eq!(orders.changed_fields.len(), 1);
    assert_eq!(orders.changed_fields[0].field, "amount");
    assert_eq!(
        orders.changed_fields[0].changes,
        vec![
            FieldAttributeChange::Type {
                old: "decimal(12,2)".to_string(),
                new: "bigint".to_string()
            },
            FieldAttributeChange::Nullable {
                old: true,
                new: false
            },
        ]
    );
}

#[test]
fn test_relationship_identity_includes_cardinality() {
    let old = model(SALES);
    let new = model(&edit(
        SALES,
        "cardinality: many_to_one",
        "cardinality: one_to_one",
    ));
    let d = compute_diff(&old, &new);
    assert_eq!(d.relationships.added.len(), 1);
    assert_eq!(d.relationships.removed.len(), 1);
    assert_eq!(d.relationships.removed[0].cardinality, "many_to_one");
    assert_eq!(d.relationships.added[0].cardinality, "one_to_one");
}

#[test]
fn test_index_changes() {
    let old = model(SALES);
    let text = edit(
        SALES,
        "fields: [customer_id, ordered_at]",
        "fields: [customer_id]\n    unique: true",
    );
    let new = model(&text);
    let d = compute_diff(&old, &new);
    assert!(d.indexes.added.is_empty());
    assert_eq!(d.indexes.changed.len(), 1);
    assert_eq!(d.indexes.changed[0].changed_fields, vec!["fields", "unique"]);
    assert_eq!(d.summary.changed_indexes, 1);

    let renamed = model(&edit(SALES, "ix_orders_customer", "ix_orders_customer_v2"));
    let d = compute_diff(&old, &renamed);
    assert_eq!(
        d.indexes.removed,
        vec![IndexKey {
            entity: "orders".to_string(),
            name: "ix_orders_customer".to_string()
        }]
    );
    assert_eq!(d.indexes.added.len(), 1);
}

#[test]
fn test_metric_contract_fields_in_fixed_order() {
    let old = model(SALES);
    let text = edit(SALES, "time_dimension: ordered_at", "time_dimension: order_id");
    let text = edit(&text, "expression: sum(amount)", "expression: sum(amount) - 1");
    let new = model(&text);
    let d = compute_diff(&old, &new);
    assert_eq!(d.changed_metrics.len(), 1);
    assert_eq!(d.changed_metrics[0].metric, "revenue");
    assert_eq!(
        d.changed_metrics[0].changed_fields,
        vec!["expression", "time_dimension"]
    );
    assert_eq!(d.summary.changed_metrics, 1);
}

#[test]
fn test_description_only_change_is_changed_but_empty() {
    let old = model(SALES);
    let new = model(&edit(SALES, "Customer master", "Customer master data"));
    let d = compute_diff(&old, &new);
    assert_eq!(d.classification, DiffClassification::Changed);
    assert_eq!(d.summary.total_changes(), 0);
}

#[test]
fn test_diff_pipeline_classifies_and_reports_invalid_inputs() {
    let text = edit(SALES, "  - name: dates\n", "  - name: calendar\n");
    match diff(SALES, &text) {
        DiffOutcome::Computed(d) => {
            assert_eq!(d.breaking_changes, vec!["Entity removed: dates"]);
            assert_eq!(d.summary.breaking_change_count, 1);
        }
        DiffOutcome::Unavailable { reason } => panic!("unexpected: {}", reason),
    }

    match diff("entities: [", SALES) {
        DiffOutcome::Unavailable { reason } => {
            assert!(reason.starts_with("baseline failed to build"));
            assert!(reason.contains("PARSE_ERROR"));
        }
        DiffOutcome::Computed(_) => panic!("baseline must not build"),
    }
}

#[test]
fn test_repeated_metric_names_do_not_fake_contract_changes() {
    let baseline = r#"
entities:
  - name: t
    fields: [{name: x}]
metrics:
  - {name: rev, entity: t, expression: sum(x)}
  - {name: rev, entity: t, expression: count(x)}
"#;
    let current = baseline.replace("  - name: t\n", "  - name: t\n    description: facts\n");

    let d = match diff(baseline, &current) {
        DiffOutcome::Computed(d) => d,
        DiffOutcome::Unavailable { reason } => panic!("unexpected: {}", reason),
    };
    assert!(d.changed_metrics.is_empty());
    assert!(d.metrics.added.is_empty());
    assert!(d.metrics.removed.is_empty());
    assert!(d.breaking_changes.is_empty());
}
