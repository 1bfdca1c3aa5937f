//! Taliesin - Iterative Deep-Research Assistant
//!
//! Main entry point for the Taliesin CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{check, research};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Taliesin - Iterative Deep-Research Assistant
#[derive(Parser)]
#[command(name = "taliesin")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Research a topic and write a cited report
    Research(research::ResearchArgs),

    /// Check backend configuration and connectivity
    Check(check::CheckArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "taliesin=debug,taliesin_research=debug,taliesin_llm=debug,taliesin_search=debug,info"
    } else {
        "taliesin=info,taliesin_research=info,taliesin_llm=info,taliesin_search=info,warn"
    };

    let log_dir = dirs::data_local_dir()
        .map(|d| d.join("taliesin").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "taliesin.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "taliesin=trace,taliesin_research=trace,taliesin_llm=trace,taliesin_search=trace,info",
                )),
        )
        .init();

    // Create context for commands
    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        Commands::Research(args) => research::run(args, &ctx).await,
        Commands::Check(args) => check::run(args, &ctx).await,
    }
}
