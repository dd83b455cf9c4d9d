//! Release gate
//!
//! Combines the validator's diagnostics for the current revision with the
//! classified diff against the baseline into a pass/fail decision.
//!
//! Precedence:
//! 1. A side without a canonical model fails the gate, not blocked by breaking.
//! 2. Any error-severity diagnostic fails the gate, not blocked by breaking.
//! 3. Breaking changes fail the gate unless the policy allows them.

pub mod classifier;

pub use classifier::classify;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::diff::{DiffOutcome, ModelDiff};
use crate::policy::GatePolicy;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GateResult {
    pub gate_passed: bool,
    /// True only when the gate failed because of breaking changes
    pub blocked_by_breaking: bool,
    pub message: String,
    /// `None` when either side failed to build
    pub diff: Option<ModelDiff>,
}

/// Decide the gate for a diff outcome and the current revision's diagnostics.
///
/// The diff is classified under `policy` before the decision.
pub fn evaluate_gate(
    outcome: DiffOutcome,
    diagnostics: &[Diagnostic],
    policy: &GatePolicy,
) -> GateResult {
    let mut diff = match outcome {
        DiffOutcome::Computed(diff) => diff,
        DiffOutcome::Unavailable { reason } => {
            return GateResult {
                gate_passed: false,
                blocked_by_breaking: false,
                message: format!("Cannot gate an invalid model: {}", reason),
                diff: None,
            };
        }
    };
    classify(&mut diff, policy);

    let errors: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.is_error()).collect();
    if let Some(first) = errors.first() {
        return GateResult {
            gate_passed: false,
            blocked_by_breaking: false,
            message: format!(
                "Gate failed: {} validation error(s); first: {}",
                errors.len(),
                first
            ),
            diff: Some(diff),
        };
    }

    let breaking = diff.breaking_changes.len();
    let (gate_passed, blocked_by_breaking, message) = if breaking == 0 {
        (true, false, "Gate passed: no breaking changes".to_string())
    } else if policy.allow_breaking {
        (
            true,
            false,
            format!("Gate passed: {} breaking change(s) allowed", breaking),
        )
    } else {
        (
            false,
            true,
            format!("Gate failed: {} breaking change(s) detected", breaking),
        )
    };

    GateResult {
        gate_passed,
        blocked_by_breaking,
        message,
        diff: Some(diff),
    }
}
