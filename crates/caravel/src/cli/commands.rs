//! CLI argument definitions.

use caravel_core::ErrorPolicy;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI structure.
#[derive(Parser)]
#[command(name = "caravel")]
#[command(about = "Migrate videos, profiles and comments between content platforms", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the migration configuration file
    #[arg(short, long, default_value = "caravel.toml")]
    pub config: PathBuf,

    /// Enable debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Pull all collections (videos, profiles, comments) into the local cache
    Pull {
        /// Re-fetch records that are already cached
        #[arg(short, long)]
        force: bool,
    },
    /// Pull the published and upcoming video collections
    PullVideos {
        /// Re-fetch records that are already cached
        #[arg(short, long)]
        force: bool,
    },
    /// Pull the comment collection
    PullComments {
        /// Re-fetch records that are already cached
        #[arg(short, long)]
        force: bool,
    },
    /// Pull validated account profiles
    PullProfiles {
        /// Re-fetch records that are already cached
        #[arg(short, long)]
        force: bool,
    },
    /// Push all cached resources to the destination, in dependency order
    Push(PushArgs),
    /// Push cached profiles to the destination
    PushProfiles(PushArgs),
    /// Push cached videos to the destination
    PushVideos(PushArgs),
    /// Push cached comments to the destination
    PushComments(PushArgs),
    /// Resolve video ownership from a spreadsheet export
    ProcessVideoMapping {
        /// Path to the CSV spreadsheet mapping video titles to owner emails
        #[arg(short, long, default_value = "video_mapping.csv")]
        spreadsheet: PathBuf,
    },
}

/// Options shared by all push commands.
#[derive(Args)]
pub struct PushArgs {
    /// Stop after this many successful pushes per resource type (0 = unbounded)
    #[arg(short, long, default_value = "1")]
    pub limit: usize,

    /// What to do when pushing a single resource fails
    #[arg(long, value_enum, default_value = "confirm")]
    pub on_error: OnError,

    /// Push only the video with this source identifier
    #[arg(long)]
    pub video_id: Option<String>,
}

/// Failure handling mode for push commands.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OnError {
    /// Log the failure and move on to the next resource
    Skip,
    /// Abort the run on the first failure
    Stop,
    /// Ask on stdin whether to continue
    Confirm,
}

impl From<OnError> for ErrorPolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Skip => ErrorPolicy::Skip,
            OnError::Stop => ErrorPolicy::Stop,
            OnError::Confirm => ErrorPolicy::Confirm,
        }
    }
}
