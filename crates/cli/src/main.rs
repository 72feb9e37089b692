//! reagent CLI — the main entry point.
//!
//! Commands:
//! - `ask`    — Run one query through the ReAct loop
//! - `tools`  — List the registered capabilities

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(
    name = "reagent",
    about = "reagent — a minimal ReAct agent for the terminal",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query through the reasoning loop
    Ask {
        /// The query. A built-in demo query is used when omitted.
        query: Option<String>,

        /// Override the iteration budget for this run
        #[arg(short = 'n', long)]
        max_iterations: Option<u32>,
    },

    /// List the registered capabilities and their documentation
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Ask {
            query,
            max_iterations,
        } => commands::ask::run(query, max_iterations).await?,
        Commands::Tools => commands::tools::run()?,
    }

    Ok(())
}
