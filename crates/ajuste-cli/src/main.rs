//! Ajuste CLI - run adaptive filters on synthetic identification problems.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ajuste")]
#[command(author, version, about = "Adaptive filter experiments", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify an unknown FIR system with one filter
    Identify(commands::identify::IdentifyArgs),

    /// Sweep the step size and score each candidate
    Explore(commands::explore::ExploreArgs),

    /// List available filters and their parameter bounds
    Filters(commands::filters::FiltersArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Identify(args) => commands::identify::run(args),
        Commands::Explore(args) => commands::explore::run(args),
        Commands::Filters(args) => commands::filters::run(args),
    }
}
