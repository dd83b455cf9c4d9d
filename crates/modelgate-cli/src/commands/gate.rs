//! Gate command
//!
//! Usage: modelgate gate <BASELINE> <CURRENT> [--allow-breaking] [--config <FILE>]
//!        [--format text|json|markdown]

use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use modelgate_core::policy::DEFAULT_POLICY_FILE;
use modelgate_core::{gate, render_human_summary, GatePolicy, GateResult};

use super::{read_document, CommandResult, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GateFormat {
    #[default]
    Text,
    Json,
    Markdown,
}

#[derive(Debug, Args)]
pub struct GateArgs {
    /// Baseline revision of the model document
    pub baseline: PathBuf,

    /// Current revision of the model document
    pub current: PathBuf,

    /// Record breaking changes without failing the gate
    #[arg(long)]
    pub allow_breaking: bool,

    /// Policy file (default: ./modelgate.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = GateFormat::Text)]
    pub format: GateFormat,
}

/// Execute gate; fails when the gate does not pass
pub fn execute(args: GateArgs) -> CommandResult {
    let policy = resolve_policy(args.config.as_deref(), args.allow_breaking)?;
    let baseline = read_document(&args.baseline)?;
    let current = read_document(&args.current)?;
    let result = gate(&baseline, &current, &policy);

    match args.format {
        GateFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        GateFormat::Markdown => print!("{}", render_human_summary(&result)),
        GateFormat::Text => print!("{}", render_text(&result)),
    }
    Ok(Verdict::from_passed(result.gate_passed))
}

/// Explicit `--config`, else the default file if present, else defaults;
/// `--allow-breaking` overrides the file
fn resolve_policy(
    config: Option<&Path>,
    allow_breaking: bool,
) -> Result<GatePolicy, Box<dyn std::error::Error>> {
    let mut policy = match config {
        Some(path) => GatePolicy::from_file(path)?,
        None if Path::new(DEFAULT_POLICY_FILE).is_file() => {
            GatePolicy::from_file(Path::new(DEFAULT_POLICY_FILE))?
        }
        None => GatePolicy::default(),
    };
    if allow_breaking {
        policy.allow_breaking = true;
    }
    tracing::debug!(
        allow_breaking = policy.allow_breaking,
        type_changes_breaking = policy.type_changes_breaking,
        "gate policy resolved"
    );
    Ok(policy)
}

fn render_text(result: &GateResult) -> String {
    let verdict = if result.gate_passed { "PASSED" } else { "FAILED" };
    let mut out = format!("{}: {}\n", verdict, result.message);
    if let Some(diff) = &result.diff {
        for breaking in &diff.breaking_changes {
            out.push_str(&format!("  ! {}\n", breaking));
        }
    }
    out
}
