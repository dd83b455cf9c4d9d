//! Subcommand implementations
//!
//! Each module exposes an `Args` struct and `execute(args)`. File I/O and
//! output formatting live here; the pipeline itself never touches disk.

pub mod diff;
pub mod edit;
pub mod gate;
pub mod validate;

use std::path::Path;

use clap::ValueEnum;

pub type CommandResult = Result<Verdict, Box<dyn std::error::Error>>;

/// Whether the command's finding should fail the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

/// Output format for `validate` and `diff`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

/// Read a model document from disk
pub fn read_document(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e).into())
}
