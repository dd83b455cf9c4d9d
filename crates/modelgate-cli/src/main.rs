//! modelgate CLI
//!
//! Command-line interface for validating, diffing, gating, and editing
//! data-model documents

use clap::{Parser, Subcommand};
use modelgate_core::logging_facility::{self, Profile};

mod commands;

use commands::Verdict;

#[derive(Debug, Parser)]
#[command(name = "modelgate")]
#[command(about = "modelgate - Data-model validation and release gate", long_about = None)]
struct Cli {
    /// Logging profile (development, production)
    #[arg(long, global = true, default_value = "development")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a model document
    Validate(commands::validate::ValidateArgs),
    /// Structural diff between two revisions
    Diff(commands::diff::DiffArgs),
    /// Gate a revision against its baseline
    Gate(commands::gate::GateArgs),
    /// Reference-preserving document edits
    Edit(commands::edit::EditArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_profile);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::Gate(args) => commands::gate::execute(args),
        Commands::Edit(args) => commands::edit::execute(args),
    };

    match result {
        Ok(Verdict::Pass) => {}
        Ok(Verdict::Fail) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
