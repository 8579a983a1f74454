//! # podkit CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// POD toolchain.
///
/// Validates, hashes, and inspects POD wire documents.
#[derive(Parser, Debug)]
#[command(name = "podkit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Schema-validate a document and run its integrity checks.
    Validate(podkit_cli::validate::ValidateArgs),
    /// Print the content hash of a value document.
    Hash(podkit_cli::hash::HashArgs),
    /// Summarize a validated document.
    Inspect(podkit_cli::inspect::InspectArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(args) => podkit_cli::validate::run(args),
        Commands::Hash(args) => podkit_cli::hash::run(args),
        Commands::Inspect(args) => podkit_cli::inspect::run(args),
    }
}
