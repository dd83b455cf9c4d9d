//! Edit command
//!
//! Usage: modelgate edit <FILE> <rename-entity|remove-entity|rename-field|remove-field> ...
//!        [--output <FILE>]
//!
//! The edited document goes to `--output` (or stdout); the edit summary and
//! a re-validation line go to stderr.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use modelgate_core::{apply_edit, validate, EditOp};

use super::{read_document, CommandResult, Verdict};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Path to the model document
    pub file: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: EditCommand,
}

#[derive(Debug, Subcommand)]
pub enum EditCommand {
    /// Rename an entity and every reference to it
    RenameEntity { from: String, to: String },
    /// Remove an entity and everything depending on it
    RemoveEntity { name: String },
    /// Rename a field and every reference to it
    RenameField {
        entity: String,
        from: String,
        to: String,
    },
    /// Remove a field and every reference to it
    RemoveField { entity: String, field: String },
}

impl From<EditCommand> for EditOp {
    fn from(command: EditCommand) -> Self {
        match command {
            EditCommand::RenameEntity { from, to } => EditOp::RenameEntity { from, to },
            EditCommand::RemoveEntity { name } => EditOp::RemoveEntity { name },
            EditCommand::RenameField { entity, from, to } => {
                EditOp::RenameField { entity, from, to }
            }
            EditCommand::RemoveField { entity, field } => EditOp::RemoveField { entity, field },
        }
    }
}

/// Execute edit; fails when the edited document no longer validates
pub fn execute(args: EditArgs) -> CommandResult {
    let text = read_document(&args.file)?;
    let op = EditOp::from(args.command);
    let (edited, summary) = apply_edit(&text, &op)?;

    eprintln!(
        "{}: updated {} reference(s)",
        op.op_name(),
        summary.updated_refs
    );
    for removed in &summary.removed {
        eprintln!("  removed {}", removed);
    }

    let report = validate(&edited);
    if report.has_errors {
        for diagnostic in report.errors.iter().filter(|d| d.is_error()) {
            eprintln!("{}", diagnostic);
        }
    }

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, &edited)?;
        eprintln!("✓ Written to {}", output_path.display());
    } else {
        print!("{}", edited);
    }
    Ok(Verdict::from_passed(!report.has_errors))
}
