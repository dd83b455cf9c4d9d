use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::model::Model;

use super::Rule;

/// Every entity of a transform-layer model declares a non-empty grain
pub struct GrainRule;

impl Rule for GrainRule {
    fn name(&self) -> &'static str {
        "missing_grain"
    }

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        model
            .entities
            .iter()
            .filter(|e| e.grain.is_empty())
            .map(|e| {
                Diagnostic::error(
                    DiagnosticCode::MissingGrain,
                    e.name.as_str(),
                    format!("Entity '{}' must declare a grain in the transform layer", e.name),
                )
            })
            .collect()
    }
}
