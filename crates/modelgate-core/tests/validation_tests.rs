#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{edit, SALES};
use modelgate_core::{validate, DiagnosticCode, Severity};

fn codes(text: &str) -> Vec<DiagnosticCode> {
    validate(text).errors.iter().map(|d| d.code).collect()
}

#[test]
fn test_clean_model_has_no_findings() {
    let report = validate(SALES);
    assert!(report.model.is_some());
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert!(!report.has_errors);
}

#[test]
fn test_transform_layer_requires_grain() {
    let text = r#"
name: staging
layer: transform
entities:
  - name: raw_orders
    fields:
      - {name: id}
  - name: raw_customers
    grain: id
    fields:
      - {name: id}
"#;
    let report = validate(text);
    assert!(report.has_errors);
    assert_eq!(report.errors.len(), 1);
    let d = &report.errors[0];
    assert_eq!(d.code, DiagnosticCode::MissingGrain);
    assert_eq!(d.severity, Severity::Error);
    assert_eq!(d.path, "raw_orders");
}

#[test]
fn test_grain_only_checked_in_transform_layer() {
    let text = "name: m\nentities:\n  - name: t\n";
    assert!(codes(text).is_empty());
}

#[test]
fn test_report_layer_requires_metrics() {
    let text = "name: dashboards\nlayer: report\nentities:\n  - name: t\n";
    let report = validate(text);
    assert!(report.has_errors);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, DiagnosticCode::MissingMetrics);
    assert_eq!(report.errors[0].path, "dashboards");
}

#[test]
fn test_report_metric_dimensions_must_exist() {
    let text = edit(SALES, "dimensions: [customer_id]", "dimensions: [channel]");
    let text = edit(&text, "time_dimension: ordered_at", "time_dimension: shipped_at");
    let report = validate(&text);
    assert!(report.has_errors);
    assert_eq!(
        codes(&text),
        vec![
            DiagnosticCode::MetricDimensionNotFound,
            DiagnosticCode::MetricTimeDimensionNotFound
        ]
    );
    assert!(report.errors.iter().all(|d| d.path == "revenue"));
}

#[test]
fn test_layer_name_is_case_insensitive() {
    let text = "name: m\nlayer: Report\nentities:\n  - name: t\n";
    assert_eq!(codes(text), vec![DiagnosticCode::MissingMetrics]);
}

#[test]
fn test_builder_warnings_precede_validator_diagnostics() {
    let text = r#"
name: mixed
state: retired
layer: report
entities:
  - name: orders
    fields:
      - {name: id}
relationships:
  - name: broken
    from: orders.id
    to: customers.id
    cardinality: many_to_one
indexes:
  - name: ix
    entity: orders
    fields: [missing]
"#;
    assert_eq!(
        codes(text),
        vec![
            DiagnosticCode::UnknownModelState,
            DiagnosticCode::RelationshipMissingEntity,
            DiagnosticCode::MissingMetrics,
            DiagnosticCode::IndexFieldNotFound,
        ]
    );
}

#[test]
fn test_warnings_alone_do_not_set_has_errors() {
    let text = edit(
        SALES,
        "customers.email: pii",
        "customers.email: pii\n    customers.phone: pii",
    );
    let report = validate(&text);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].code, DiagnosticCode::GovernanceRefNotFound);
    assert_eq!(report.errors[0].path, "customers.phone");
    assert!(!report.has_errors);
}

#[test]
fn test_fatal_errors_replace_the_model() {
    let cases = [
        ("entities: [", DiagnosticCode::ParseError, ""),
        ("- just\n- a list\n", DiagnosticCode::InvalidRoot, ""),
        ("name: m\n", DiagnosticCode::MissingEntities, ""),
        (
            "entities:\n  - name: a\n  - name: a\n",
            DiagnosticCode::DuplicateEntity,
            "a",
        ),
        (
            "entities:\n  - name: a\n    fields: [{name: x}, {name: x}]\n",
            DiagnosticCode::DuplicateField,
            "a.x",
        ),
    ];
    for (text, code, path) in cases {
        let report = validate(text);
        assert!(report.model.is_none(), "{}", text);
        assert!(report.has_errors);
        assert_eq!(report.errors.len(), 1, "{}", text);
        assert_eq!(report.errors[0].code, code, "{}", text);
        assert_eq!(report.errors[0].path, path, "{}", text);
    }
}

#[test]
fn test_validate_is_deterministic() {
    let text = edit(SALES, "dimensions: [customer_id]", "dimensions: [channel, region]");
    let first = serde_json::to_string(&validate(&text)).unwrap();
    let second = serde_json::to_string(&validate(&text)).unwrap();
    assert_eq!(first, second);
}
