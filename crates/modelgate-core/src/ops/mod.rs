//! Document edit operations
//!
//! Referential-integrity-preserving edits over the generic document. Edits
//! never touch a canonical model: the edited document is re-serialized and
//! re-enters the pipeline.

pub mod document_ops;

pub use document_ops::{remove_entity, remove_field, rename_entity, rename_field, EditSummary};

use crate::errors::Result;
use crate::loader::load_document;
use crate::{log_op_end, log_op_error, log_op_start};

/// A single document edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    RenameEntity { from: String, to: String },
    RemoveEntity { name: String },
    RenameField { entity: String, from: String, to: String },
    RemoveField { entity: String, field: String },
}

impl EditOp {
    /// Operation name used in logs and errors
    pub fn op_name(&self) -> &'static str {
        match self {
            EditOp::RenameEntity { .. } => "rename_entity",
            EditOp::RemoveEntity { .. } => "remove_entity",
            EditOp::RenameField { .. } => "rename_field",
            EditOp::RemoveField { .. } => "remove_field",
        }
    }
}

/// Apply `op` to the document in `text` and return the re-serialized YAML
///
/// # Errors
///
/// - Any fatal loader error for `text`
/// - `NotFound` / `AlreadyExists` from the edit itself
/// - `Serialization` if the result cannot be emitted
pub fn apply_edit(text: &str, op: &EditOp) -> Result<(String, EditSummary)> {
    let op_name = op.op_name();
    log_op_start!(op_name);
    let start = std::time::Instant::now();

    let result = apply_edit_impl(text, op).map_err(|e| {
        let e = e.with_op(op_name);
        log_op_error!(
            op_name,
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        op_name,
        duration_ms = start.elapsed().as_millis() as u64,
        updated_refs = result.1.updated_refs,
        removed_count = result.1.removed.len()
    );
    Ok(result)
}

fn apply_edit_impl(text: &str, op: &EditOp) -> Result<(String, EditSummary)> {
    let mut doc = load_document(text)?;
    let summary = match op {
        EditOp::RenameEntity { from, to } => rename_entity(&mut doc, from, to)?,
        EditOp::RemoveEntity { name } => remove_entity(&mut doc, name)?,
        EditOp::RenameField { entity, from, to } => rename_field(&mut doc, entity, from, to)?,
        EditOp::RemoveField { entity, field } => remove_field(&mut doc, entity, field)?,
    };
    Ok((doc.to_yaml_string()?, summary))
}
