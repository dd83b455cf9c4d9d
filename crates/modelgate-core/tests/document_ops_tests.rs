#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{model, SALES};
use modelgate_core::{apply_edit, validate, DiagnosticCode, EditOp, ExErrorKind};

fn not_found_codes(text: &str) -> Vec<DiagnosticCode> {
    validate(text)
        .errors
        .into_iter()
        .map(|d| d.code)
        .filter(|c| c.as_str().ends_with("_NOT_FOUND"))
        .collect()
}

#[test]
fn test_remove_referenced_field_leaves_no_dangling_refs() {
    let targets = [
        ("orders", "customer_id"),
        ("orders", "ordered_at"),
        ("orders", "amount"),
        ("customers", "email"),
        ("customers", "customer_id"),
    ];
    for (entity, field) in targets {
        let op = EditOp::RemoveField {
            entity: entity.to_string(),
            field: field.to_string(),
        };
        let (edited, _) = apply_edit(SALES, &op).unwrap();
        assert!(
            not_found_codes(&edited).is_empty(),
            "{}.{} left {:?}",
            entity,
            field,
            not_found_codes(&edited)
        );
        let m = model(&edited);
        assert!(!m.entity(entity).unwrap().has_field(field));
    }
}

#[test]
fn test_remove_field_cascades() {
    let op = EditOp::RemoveField {
        entity: "orders".to_string(),
        field: "ordered_at".to_string(),
    };
    let (edited, summary) = apply_edit(SALES, &op).unwrap();
    assert!(summary.removed.is_empty());
    let m = model(&edited);
    assert_eq!(m.indexes[0].field_names(), vec!["customer_id"]);
    assert!(m.metric("revenue").unwrap().time_dimension.is_none());
}

#[test]
fn test_remove_entity_cascades() {
    let op = EditOp::RemoveEntity {
        name: "customers".to_string(),
    };
    let (edited, summary) = apply_edit(SALES, &op).unwrap();
    assert_eq!(
        summary.removed,
        vec!["relationship order_customer", "classification customers.email"]
    );
    let report = validate(&edited);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let m = report.model.unwrap();
    let orders = m.entity("orders").unwrap();
    assert_eq!(orders.kind.dimension_refs(), &["dates".to_string()]);
}

#[test]
fn test_rename_entity_keeps_model_equivalent() {
    let op = EditOp::RenameEntity {
        from: "orders".to_string(),
        to: "sales_orders".to_string(),
    };
    let (edited, summary) = apply_edit(SALES, &op).unwrap();
    assert_eq!(summary.updated_refs, 4);
    let report = validate(&edited);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let m = report.model.unwrap();
    assert_eq!(m.relationships.len(), 1);
    assert_eq!(m.relationships[0].from.entity, "sales_orders");
    assert_eq!(m.metric("revenue").unwrap().entity, "sales_orders");
    assert_eq!(m.glossary[0].related_fields[0].name, "sales_orders.amount");
}

#[test]
fn test_rename_field_rewrites_every_reference() {
    let op = EditOp::RenameField {
        entity: "orders".to_string(),
        from: "customer_id".to_string(),
        to: "buyer_id".to_string(),
    };
    let (edited, _) = apply_edit(SALES, &op).unwrap();
    let report = validate(&edited);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    let m = report.model.unwrap();
    assert_eq!(m.relationships[0].from.qualified(), "orders.buyer_id");
    assert_eq!(m.indexes[0].field_names(), vec!["buyer_id", "ordered_at"]);
    let revenue = m.metric("revenue").unwrap();
    assert_eq!(revenue.grain, vec!["buyer_id"]);
    assert_eq!(revenue.dimension_names(), vec!["buyer_id"]);
}

#[test]
fn test_edit_errors() {
    let missing = EditOp::RemoveEntity {
        name: "ghosts".to_string(),
    };
    let err = apply_edit(SALES, &missing).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.op(), Some("remove_entity"));

    let clash = EditOp::RenameEntity {
        from: "orders".to_string(),
        to: "dates".to_string(),
    };
    let err = apply_edit(SALES, &clash).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);

    let err = apply_edit("entities: [", &missing).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ParseError);
}
