//! Pipeline entry points
//!
//! Text in, results out: load → build → validate, and diff/gate over two
//! revisions. None of these return `Err`; fatal failures surface as a
//! single error diagnostic or an unavailable diff.

use serde::Serialize;

use modelgate_core_types::RequestId;

use crate::builder::{build_model, BuildOutput};
use crate::diagnostics::Diagnostic;
use crate::diff::DiffOutcome;
use crate::errors::Result;
use crate::gate::{classify, evaluate_gate, GateResult};
use crate::loader::load_document;
use crate::model::Model;
use crate::policy::GatePolicy;
use crate::rules::validate_model;
use crate::{log_op_end, log_op_error, log_op_start};

/// Validator output: `{model, errors, hasErrors}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// `None` when a fatal error stopped canonicalization
    pub model: Option<Model>,
    /// Builder warnings, then validator diagnostics
    pub errors: Vec<Diagnostic>,
    pub has_errors: bool,
}

impl ValidationReport {
    fn new(model: Option<Model>, errors: Vec<Diagnostic>) -> Self {
        let has_errors = errors.iter().any(Diagnostic::is_error);
        Self {
            model,
            errors,
            has_errors,
        }
    }

    /// First error-severity diagnostic, if any
    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.errors.iter().find(|d| d.is_error())
    }
}

/// Load and canonicalize `text`, keeping fatal errors as `Err`
///
/// # Errors
///
/// Any fatal loader or builder error.
pub fn build_from_text(text: &str) -> Result<BuildOutput> {
    let doc = load_document(text)?;
    build_model(&doc)
}

/// Validate a model document
pub fn validate(text: &str) -> ValidationReport {
    let request_id = RequestId::new();
    log_op_start!("validate", request_id = %request_id);
    let start = std::time::Instant::now();

    let built = match build_from_text(text) {
        Ok(built) => built,
        Err(e) => {
            let e = e.with_request_id(request_id);
            log_op_error!(
                "validate",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            return ValidationReport::new(None, vec![Diagnostic::from_fatal(&e)]);
        }
    };

    let mut errors = built.warnings;
    errors.extend(validate_model(&built.model));
    let report = ValidationReport::new(Some(built.model), errors);

    log_op_end!(
        "validate",
        duration_ms = start.elapsed().as_millis() as u64,
        model_name = report.model.as_ref().map(|m| m.name.as_str()).unwrap_or_default(),
        entity_count = report.model.as_ref().map(|m| m.entities.len()).unwrap_or_default(),
        diagnostic_count = report.errors.len(),
        has_errors = report.has_errors
    );
    report
}

fn outcome(baseline: &ValidationReport, current: &ValidationReport) -> DiffOutcome {
    let describe = |side: &str, report: &ValidationReport| match report.first_error() {
        Some(first) => format!("{} failed to build ({})", side, first),
        None => format!("{} failed to build", side),
    };
    match (&baseline.model, &current.model) {
        (Some(old), Some(new)) => DiffOutcome::Computed(crate::diff::compute_diff(old, new)),
        (None, Some(_)) => DiffOutcome::Unavailable {
            reason: describe("baseline", baseline),
        },
        (Some(_), None) => DiffOutcome::Unavailable {
            reason: describe("current revision", current),
        },
        (None, None) => DiffOutcome::Unavailable {
            reason: format!(
                "{}; {}",
                describe("baseline", baseline),
                describe("current revision", current)
            ),
        },
    }
}

/// Diff two revisions, classified under the default gate policy
pub fn diff(baseline: &str, current: &str) -> DiffOutcome {
    diff_with_policy(baseline, current, &GatePolicy::default())
}

/// Diff two revisions, classifying breaking changes under `policy`
pub fn diff_with_policy(baseline: &str, current: &str, policy: &GatePolicy) -> DiffOutcome {
    log_op_start!("diff");
    let start = std::time::Instant::now();

    let mut result = outcome(&validate(baseline), &validate(current));
    if let DiffOutcome::Computed(diff) = &mut result {
        classify(diff, policy);
    }

    log_op_end!(
        "diff",
        duration_ms = start.elapsed().as_millis() as u64,
        available = result.diff().is_some(),
        breaking_count = result
            .diff()
            .map(|d| d.summary.breaking_change_count)
            .unwrap_or_default()
    );
    result
}

/// Gate `current` against `baseline`
pub fn gate(baseline: &str, current: &str, policy: &GatePolicy) -> GateResult {
    log_op_start!(
        "gate",
        allow_breaking = policy.allow_breaking,
        type_changes_breaking = policy.type_changes_breaking
    );
    let start = std::time::Instant::now();

    let current_report = validate(current);
    let result = evaluate_gate(
        outcome(&validate(baseline), &current_report),
        &current_report.errors,
        policy,
    );

    log_op_end!(
        "gate",
        duration_ms = start.elapsed().as_millis() as u64,
        gate_passed = result.gate_passed,
        blocked_by_breaking = result.blocked_by_breaking,
        breaking_count = result
            .diff
            .as_ref()
            .map(|d| d.summary.breaking_change_count)
            .unwrap_or_default()
    );
    result
}
