use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::model::{FieldSlot, Metric, Model};

use super::Rule;

/// A report-layer model defines at least one metric
pub struct MetricsPresentRule;

impl Rule for MetricsPresentRule {
    fn name(&self) -> &'static str {
        "missing_metrics"
    }

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        if !model.metrics.is_empty() {
            return Vec::new();
        }
        vec![Diagnostic::error(
            DiagnosticCode::MissingMetrics,
            model.name.as_str(),
            "Report layer models must define at least one metric",
        )]
    }
}

/// Metric dimensions and time dimension name fields of the metric's own entity.
///
/// A metric whose entity does not exist reports every dimension; the
/// missing entity itself is reported by `MetricEntityRule`.
pub struct MetricDimensionRule;

impl MetricDimensionRule {
    fn resolves(model: &Model, metric: &Metric, slot: &FieldSlot) -> bool {
        match (slot.handle, metric.entity_id) {
            (Some(handle), Some(owner)) => {
                handle.entity == owner
                    && model.field(handle).is_some_and(|f| f.name == slot.name)
            }
            _ => false,
        }
    }
}

impl Rule for MetricDimensionRule {
    fn name(&self) -> &'static str {
        "metric_dimensions"
    }

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for metric in &model.metrics {
            for dimension in &metric.dimensions {
                if !Self::resolves(model, metric, dimension) {
                    diagnostics.push(Diagnostic::error(
                        DiagnosticCode::MetricDimensionNotFound,
                        metric.name.as_str(),
                        format!(
                            "Metric '{}' dimension '{}' is not a field of '{}'",
                            metric.name, dimension.name, metric.entity
                        ),
                    ));
                }
            }
            if let Some(time_dimension) = &metric.time_dimension {
                if !Self::resolves(model, metric, time_dimension) {
                    diagnostics.push(Diagnostic::error(
                        DiagnosticCode::MetricTimeDimensionNotFound,
                        metric.name.as_str(),
                        format!(
                            "Metric '{}' time dimension '{}' is not a field of '{}'",
                            metric.name, time_dimension.name, metric.entity
                        ),
                    ));
                }
            }
        }
        diagnostics
    }
}
