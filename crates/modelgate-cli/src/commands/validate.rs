//! Validate command
//!
//! Usage: modelgate validate <FILE> [--format text|json]

use clap::Args;
use std::path::PathBuf;

use modelgate_core::{validate, ValidationReport};

use super::{read_document, CommandResult, Format, Verdict};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the model document
    pub file: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// Execute validate; fails when the report has error-severity diagnostics
pub fn execute(args: ValidateArgs) -> CommandResult {
    let text = read_document(&args.file)?;
    let report = validate(&text);
    tracing::debug!(file = %args.file.display(), has_errors = report.has_errors, "validated");

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print!("{}", render_text(&report)),
    }
    Ok(Verdict::from_passed(!report.has_errors))
}

fn render_text(report: &ValidationReport) -> String {
    let mut out = String::new();
    for diagnostic in &report.errors {
        out.push_str(&format!("{}\n", diagnostic));
    }
    let errors = report.errors.iter().filter(|d| d.is_error()).count();
    let warnings = report.errors.len() - errors;
    match &report.model {
        Some(model) => out.push_str(&format!(
            "{}: {} entities, {} error(s), {} warning(s)\n",
            model.name,
            model.entities.len(),
            errors,
            warnings
        )),
        None => out.push_str("model could not be built\n"),
    }
    out
}
