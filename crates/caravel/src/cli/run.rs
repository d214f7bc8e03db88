//! Command handlers.

use super::{Commands, PushArgs};
use crate::config::MigrationConfig;
use caravel_dest::{AssetStore, DestClient, TokenBroker};
use caravel_error::CaravelResult;
use caravel_pipeline::{PullPipeline, PushOptions, PushPipeline, resolve_ownership};
use caravel_source::SourceClient;
use caravel_storage::{MappingStore, OwnershipTable, ResourceStore};
use std::path::Path;
use tracing::info;

/// Run one of the pull commands.
pub async fn run_pull(
    config: &MigrationConfig,
    command: &Commands,
    force: bool,
) -> CaravelResult<()> {
    let store = ResourceStore::new(&config.cache_root)?;
    let source = SourceClient::new(config.source.clone());
    let pipeline = PullPipeline::new(store, source);

    match command {
        Commands::Pull { .. } => pipeline.pull(force).await,
        Commands::PullVideos { .. } => pipeline.pull_videos(force).await,
        Commands::PullComments { .. } => pipeline.pull_comments(force).await,
        Commands::PullProfiles { .. } => pipeline.pull_profiles(force).await,
        _ => Ok(()),
    }
}

/// Run one of the push commands.
pub async fn run_push(
    config: &MigrationConfig,
    command: &Commands,
    args: &PushArgs,
) -> CaravelResult<()> {
    let store = ResourceStore::new(&config.cache_root)?;
    let mapping = MappingStore::open(config.mapping_path(), config.destination.api_url())?;
    let ownership = OwnershipTable::load(config.ownership_path())?;
    let dest = DestClient::new(&config.destination);
    let tokens = TokenBroker::new(
        config.destination.api_url(),
        config.destination.password.clone(),
    );
    let assets = AssetStore::new(config.asset_store.clone());

    let mut pipeline = PushPipeline::new(
        store,
        mapping,
        dest,
        tokens,
        assets,
        ownership,
        &config.destination,
    );
    let opts = PushOptions {
        policy: args.on_error.into(),
        limit: args.limit,
        video_id: args.video_id.clone(),
    };

    match command {
        Commands::Push(_) => pipeline.push(&opts).await,
        Commands::PushProfiles(_) => pipeline.push_profiles(&opts).await.map(|_| ()),
        Commands::PushVideos(_) => pipeline.push_videos(&opts).await.map(|_| ()),
        Commands::PushComments(_) => pipeline.push_comments(&opts).await.map(|_| ()),
        _ => Ok(()),
    }
}

/// Resolve video ownership from a spreadsheet export.
pub fn run_ownership(config: &MigrationConfig, spreadsheet: &Path) -> CaravelResult<()> {
    let store = ResourceStore::new(&config.cache_root)?;
    let table = OwnershipTable::load(config.ownership_path())?;
    let report = resolve_ownership(&store, spreadsheet, table)?;
    if !report.unknown_owners.is_empty() {
        info!(
            owners = ?report.unknown_owners,
            "Spreadsheet owners without a pulled profile"
        );
    }
    Ok(())
}
