#![allow(clippy::unwrap_used, clippy::expect_used)]

use modelgate_core::errors::ModelError;
use modelgate_core::logging_facility::test_capture::init_test_capture;
use modelgate_core::{apply_edit, gate, log_op_end, log_op_error, log_op_start, validate};
use modelgate_core::{EditOp, GatePolicy};
use modelgate_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ENTITY_COUNT,
    FIELD_ERR_CODE, FIELD_MODEL_NAME, FIELD_REQUEST_ID,
};

fn model_named(name: &str) -> String {
    format!("name: {}\nentities:\n  - name: t\n    fields: [{{name: id}}]\n", name)
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_1";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_2";

    let err = ModelError::DuplicateEntity {
        entity: "orders".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("DUPLICATE_ENTITY"));
    assert!(events[0].component.is_some());
}

#[test]
fn test_validate_logs_start_and_end_with_model_name() {
    let capture = init_test_capture();
    let report = validate(&model_named("logging_probe_model"));
    assert!(!report.has_errors);

    let ends: Vec<_> = capture
        .events_for_op("validate")
        .into_iter()
        .filter(|e| e.field(FIELD_MODEL_NAME) == Some("logging_probe_model"))
        .collect();
    assert_eq!(ends.len(), 1);
    assert_eq!(ends[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(ends[0].field(FIELD_ENTITY_COUNT), Some("1"));
    assert_eq!(ends[0].field("has_errors"), Some("false"));
    capture.assert_event_exists("validate", EVENT_START);
    let tagged_starts = capture.count_events(|e| {
        e.op.as_deref() == Some("validate")
            && e.event.as_deref() == Some(EVENT_START)
            && e.field(FIELD_REQUEST_ID).is_some()
    });
    assert!(tagged_starts >= 1);
}

#[test]
fn test_fatal_validate_ends_with_error_event() {
    let capture = init_test_capture();
    let report = validate("entities:\n  - name: dup_probe\n  - name: dup_probe\n");
    assert!(report.has_errors);

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("validate")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("DUPLICATE_ENTITY")
    });
    assert!(errors >= 1);
}

#[test]
fn test_gate_logs_verdict() {
    let capture = init_test_capture();
    let text = model_named("gate_probe_model");
    let result = gate(&text, &text, &GatePolicy::allowing_breaking());
    assert!(result.gate_passed);

    let verdicts = capture.count_events(|e| {
        e.op.as_deref() == Some("gate")
            && e.event.as_deref() == Some(EVENT_END)
            && e.field("gate_passed") == Some("true")
    });
    assert!(verdicts >= 1);
    capture.assert_event_exists("gate", EVENT_START);
}

#[test]
fn test_failed_edit_logs_error_for_its_op() {
    let capture = init_test_capture();
    let op = EditOp::RemoveField {
        entity: "t".to_string(),
        field: "missing".to_string(),
    };
    assert!(apply_edit(&model_named("edit_probe"), &op).is_err());

    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("remove_field")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("NOT_FOUND")
    });
    assert_eq!(errors, 1);
}
