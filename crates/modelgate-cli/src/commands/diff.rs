//! Diff command
//!
//! Usage: modelgate diff <BASELINE> <CURRENT> [--format text|json]

use clap::Args;
use std::path::PathBuf;

use modelgate_core::{diff, DiffOutcome, ModelDiff};

use super::{read_document, CommandResult, Format, Verdict};

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Baseline revision of the model document
    pub baseline: PathBuf,

    /// Current revision of the model document
    pub current: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// Execute diff; fails only when one side cannot be built
pub fn execute(args: DiffArgs) -> CommandResult {
    let baseline = read_document(&args.baseline)?;
    let current = read_document(&args.current)?;
    let outcome = diff(&baseline, &current);

    match args.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        Format::Text => match &outcome {
            DiffOutcome::Computed(d) => print!("{}", render_text(d)),
            DiffOutcome::Unavailable { reason } => {
                println!("Cannot diff an invalid model: {}", reason)
            }
        },
    }
    Ok(Verdict::from_passed(outcome.diff().is_some()))
}

fn render_text(diff: &ModelDiff) -> String {
    if diff.is_identical() {
        return "identical\n".to_string();
    }

    let mut out = String::new();
    let entities = &diff.entities;
    for name in &entities.added {
        out.push_str(&format!("+ entity {}\n", name));
    }
    for name in &entities.removed {
        out.push_str(&format!("- entity {}\n", name));
    }
    for change in &entities.changed {
        out.push_str(&format!("~ entity {}\n", change.entity));
        for field in &change.added_fields {
            out.push_str(&format!("    + {}\n", field));
        }
        for field in &change.removed_fields {
            out.push_str(&format!("    - {}\n", field));
        }
        for field in &change.changed_fields {
            out.push_str(&format!("    ~ {}\n", field.field));
        }
    }
    for key in &diff.relationships.added {
        out.push_str(&format!("+ relationship {}\n", key.name));
    }
    for key in &diff.relationships.removed {
        out.push_str(&format!("- relationship {}\n", key.name));
    }
    for key in &diff.indexes.added {
        out.push_str(&format!("+ index {}.{}\n", key.entity, key.name));
    }
    for key in &diff.indexes.removed {
        out.push_str(&format!("- index {}.{}\n", key.entity, key.name));
    }
    for change in &diff.indexes.changed {
        out.push_str(&format!(
            "~ index {}.{} ({})\n",
            change.entity,
            change.name,
            change.changed_fields.join(", ")
        ));
    }
    for name in &diff.metrics.added {
        out.push_str(&format!("+ metric {}\n", name));
    }
    for name in &diff.metrics.removed {
        out.push_str(&format!("- metric {}\n", name));
    }
    for change in &diff.changed_metrics {
        out.push_str(&format!(
            "~ metric {} ({})\n",
            change.metric,
            change.changed_fields.join(", ")
        ));
    }
    for breaking in &diff.breaking_changes {
        out.push_str(&format!("! {}\n", breaking));
    }
    out.push_str(&format!(
        "{} change(s), {} breaking\n",
        diff.summary.total_changes(),
        diff.summary.breaking_change_count
    ));
    out
}
