//! Semantic validation rules
//!
//! Each rule is an independent predicate over a canonical [`Model`]. Rules
//! are registered either as always-on or under a layer name; the model's
//! `layer` selects which layered rules run. Evaluation order is layer rules
//! in registration order, then always-on rules.
//!
//! ## Built-in layers
//!
//! - `transform`: [`transform::GrainRule`]
//! - `report`: [`report::MetricsPresentRule`], [`report::MetricDimensionRule`]
//! - always: [`references::GovernanceRefRule`], [`references::IndexFieldRule`],
//!   [`references::MetricEntityRule`], [`references::GlossaryRefRule`]

pub mod references;
pub mod report;
pub mod transform;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::diagnostics::Diagnostic;
use crate::model::Model;

pub const LAYER_TRANSFORM: &str = "transform";
pub const LAYER_REPORT: &str = "report";

/// A validation rule
pub trait Rule: Send + Sync {
    /// Stable rule name, used in logs
    fn name(&self) -> &'static str;

    fn evaluate(&self, model: &Model) -> Vec<Diagnostic>;
}

/// Rules keyed by layer
#[derive(Default)]
pub struct RuleRegistry {
    always: Vec<Box<dyn Rule>>,
    layered: BTreeMap<String, Vec<Box<dyn Rule>>>,
}

impl RuleRegistry {
    /// Registry with no rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in rules
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register_for_layer(LAYER_TRANSFORM, Box::new(transform::GrainRule));
        registry.register_for_layer(LAYER_REPORT, Box::new(report::MetricsPresentRule));
        registry.register_for_layer(LAYER_REPORT, Box::new(report::MetricDimensionRule));
        registry.register(Box::new(references::GovernanceRefRule));
        registry.register(Box::new(references::IndexFieldRule));
        registry.register(Box::new(references::MetricEntityRule));
        registry.register(Box::new(references::GlossaryRefRule));
        registry
    }

    /// Register a rule that runs for every model
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.always.push(rule);
    }

    /// Register a rule that runs only for models declaring `layer`
    /// (case-insensitive)
    pub fn register_for_layer(&mut self, layer: &str, rule: Box<dyn Rule>) {
        self.layered
            .entry(layer.to_ascii_lowercase())
            .or_default()
            .push(rule);
    }

    /// Names of the rules that would run for `layer`, in evaluation order
    pub fn rule_names(&self, layer: Option<&str>) -> Vec<&'static str> {
        self.active(layer).map(|r| r.name()).collect()
    }

    /// Run every applicable rule against `model`
    pub fn evaluate(&self, model: &Model) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in self.active(model.layer.as_deref()) {
            let found = rule.evaluate(model);
            if !found.is_empty() {
                tracing::debug!(rule = rule.name(), count = found.len(), "rule reported");
            }
            diagnostics.extend(found);
        }
        diagnostics
    }

    fn active<'a>(&'a self, layer: Option<&str>) -> impl Iterator<Item = &'a dyn Rule> + 'a {
        let layered = layer
            .and_then(|l| self.layered.get(&l.to_ascii_lowercase()))
            .map(|rules| rules.as_slice())
            .unwrap_or_default();
        layered
            .iter()
            .chain(self.always.iter())
            .map(|rule| &**rule)
    }
}

/// Shared registry holding the built-in rules
pub fn default_registry() -> &'static RuleRegistry {
    static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();
    REGISTRY.get_or_init(RuleRegistry::with_defaults)
}

/// Validate a model against the built-in rules
pub fn validate_model(model: &Model) -> Vec<Diagnostic> {
    default_registry().evaluate(model)
}
