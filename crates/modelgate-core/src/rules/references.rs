//! Always-on reference checks. These only ever warn.

use crate::diagnostics::{Diagnostic, DiagnosticCode};
use crate::model::Model;

use super::Rule;

/// Governance classification keys resolve to `Entity.field`
pub struct GovernanceRefRule;

impl Rule for GovernanceRefRule {
    fn name(&self) -> &'static str {
        "governance_refs"
    }

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        model
            .governance
            .classification
            .iter()
            .filter(|c| c.target.is_none())
            .map(|c| {
                Diagnostic::warning(
                    DiagnosticCode::GovernanceRefNotFound,
                    c.key.as_str(),
                    format!("Governance classification '{}' does not match any field", c.key),
                )
            })
            .collect()
    }
}

/// Index field lists resolve on the indexed entity
pub struct IndexFieldRule;

impl Rule for IndexFieldRule {
    fn name(&self) -> &'static str {
        "index_fields"
    }

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for index in &model.indexes {
            for slot in index.fields.iter().filter(|s| !s.is_resolved()) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::IndexFieldNotFound,
                    index.name.as_str(),
                    format!(
                        "Index '{}' references missing field '{}.{}'",
                        index.name, index.entity, slot.name
                    ),
                ));
            }
        }
        diagnostics
    }
}

/// Metrics are defined over an existing entity
pub struct MetricEntityRule;

impl Rule for MetricEntityRule {
    fn name(&self) -> &'static str {
        "metric_entities"
    }

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        model
            .metrics
            .iter()
            .filter(|m| m.entity_id.is_none())
            .map(|m| {
                Diagnostic::warning(
                    DiagnosticCode::MetricEntityNotFound,
                    m.name.as_str(),
                    format!("Metric '{}' references missing entity '{}'", m.name, m.entity),
                )
            })
            .collect()
    }
}

/// Glossary related fields resolve to `Entity.field`
pub struct GlossaryRefRule;

impl Rule for GlossaryRefRule {
    fn name(&self) -> &'static str {
        "glossary_refs"
    }

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for term in &model.glossary {
            for slot in term.related_fields.iter().filter(|s| !s.is_resolved()) {
                diagnostics.push(Diagnostic::warning(
                    DiagnosticCode::GlossaryRefNotFound,
                    term.term.as_str(),
                    format!(
                        "Glossary term '{}' references missing field '{}'",
                        term.term, slot.name
                    ),
                ));
            }
        }
        diagnostics
    }
}
