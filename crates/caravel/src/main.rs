//! Caravel CLI binary.
//!
//! Migrates profiles, videos, and comments from a source content API to a
//! destination video host:
//! - Pull resource collections into the resumable local cache
//! - Push cached resources to the destination, idempotently and in
//!   dependency order
//! - Resolve video ownership from an external spreadsheet

use clap::Parser;

mod cli;
mod config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_ownership, run_pull, run_push};

    // Secrets come from the environment; a .env file is honored when present.
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = config::MigrationConfig::from_file(&cli.config)?;

    // Execute the requested command
    match &cli.command {
        cmd @ (Commands::Pull { force }
        | Commands::PullVideos { force }
        | Commands::PullComments { force }
        | Commands::PullProfiles { force }) => {
            run_pull(&config, cmd, *force).await?;
        }

        cmd @ (Commands::Push(push)
        | Commands::PushProfiles(push)
        | Commands::PushVideos(push)
        | Commands::PushComments(push)) => {
            run_push(&config, cmd, push).await?;
        }

        Commands::ProcessVideoMapping { spreadsheet } => {
            run_ownership(&config, spreadsheet)?;
        }
    }

    Ok(())
}
