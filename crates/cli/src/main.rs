//! Quotecheck CLI - Main Entry Point
//!
//! Runs business-rule validation scenarios against the quoting application
//! and reports on the rule trace they leave behind.

use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{catalogue, run, trace};

/// Quotecheck - business-rule validation for the quoting flow
#[derive(Parser)]
#[command(name = "quotecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run validation scenarios in a browser
    Run(run::RunArgs),

    /// Inspect rule trace logs
    #[command(subcommand)]
    Trace(trace::TraceCommands),

    /// Show the options of a dropdown
    Catalogue(catalogue::CatalogueArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run(args) => run::execute(args, cli.format).await?,
        Commands::Trace(cmd) => trace::execute(cmd, cli.format)?,
        Commands::Catalogue(args) => catalogue::execute(args, cli.format)?,
        Commands::Version => {
            println!("quotecheck v{}", quotecheck_common::VERSION);
            println!("Business-rule validation for the quoting flow");
        }
    }

    Ok(())
}
