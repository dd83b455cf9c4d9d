//! modelgate core - canonical data-model pipeline
//!
//! This crate turns YAML data-model documents into a strongly typed
//! canonical model and checks them before release:
//! - Structural loading and canonicalization with resolved field handles
//! - Layer-scoped semantic validation through a rule registry
//! - Structural diff between two revisions
//! - Breaking-change classification and the release gate
//! - Reference-preserving document edits
//!
//! Every stage is a pure function; the pipeline does no I/O.

pub mod builder;
pub mod diagnostics;
pub mod diff;
pub mod errors;
pub mod gate;
pub mod loader;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod pipeline;
pub mod policy;
pub mod rules;

// Re-export commonly used types
pub use builder::{build_model, BuildOutput};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use diff::{compute_diff, diff_models, render_human_summary, DiffOutcome, ModelDiff};
pub use errors::{ExError, ExErrorKind, ModelError, Result};
pub use gate::{classify, evaluate_gate, GateResult};
pub use loader::{load_document, Document};
pub use model::{Entity, EntityId, EntityKind, Field, FieldRef, Model};
pub use ops::{apply_edit, EditOp, EditSummary};
pub use pipeline::{build_from_text, diff, diff_with_policy, gate, validate, ValidationReport};
pub use policy::GatePolicy;
pub use rules::{default_registry, validate_model, Rule, RuleRegistry};
