mod cli;
mod commands;
mod telemetry;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    // Load environment variables from an optional .env file.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    telemetry::init(&cli.log);
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "failed to read .env");
        }
    }

    let result = match cli.command {
        Commands::Ingest(args) => commands::ingest::run(args).await,
        Commands::Query(args) => commands::query::run(args).await,
        Commands::Serve(args) => commands::serve::run(args).await,
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
