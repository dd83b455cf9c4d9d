//! Structural model diff.
//!
//! Compares two canonical models and produces a structured, deterministic
//! diff suitable for the release gate and human review.
//!
//! ## Entry point
//!
//! ```
//! use modelgate_core::{build_model, load_document};
//! use modelgate_core::diff::compute_diff;
//!
//! let old = build_model(&load_document("entities:\n  - name: a\n").unwrap()).unwrap();
//! let new = build_model(&load_document("entities:\n  - name: b\n").unwrap()).unwrap();
//! let diff = compute_diff(&old.model, &new.model);
//! assert_eq!(diff.entities.removed, vec!["a"]);
//! assert_eq!(diff.entities.added, vec!["b"]);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical structured output.
//! - **Identity fast path**: models with the same canonical digest are
//!   reported `Identical` with every category empty.
//! - **Declaration order**: no category is sorted; output follows the
//!   documents.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_diff, diff_models, model_digest, DiffOutcome};
pub use human_summary::render_human_summary;
pub use model::ModelDiff;
