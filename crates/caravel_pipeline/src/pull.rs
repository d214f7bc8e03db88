//! Pull pipeline: source collections → local resource store.

use caravel_core::{Comment, Profile, Video};
use caravel_error::{CaravelResult, JsonError};
use caravel_source::SourceClient;
use caravel_storage::ResourceStore;
use tracing::{info, instrument};

/// Materializes source collections into the local resource store.
pub struct PullPipeline {
    store: ResourceStore,
    source: SourceClient,
}

impl PullPipeline {
    /// Build a pull pipeline over the given store and source client.
    pub fn new(store: ResourceStore, source: SourceClient) -> Self {
        Self { store, source }
    }

    /// Pull everything: videos (published and upcoming), profiles, comments.
    pub async fn pull(&self, force: bool) -> CaravelResult<()> {
        self.pull_videos(force).await?;
        self.pull_profiles(force).await?;
        self.pull_comments(force).await?;
        Ok(())
    }

    /// Pull the published video collection, then the upcoming collection
    /// with the quarantine flag set.
    ///
    /// A failed media download is fatal for the run; a failed thumbnail
    /// download is tolerated inside the store.
    #[instrument(skip(self))]
    pub async fn pull_videos(&self, force: bool) -> CaravelResult<()> {
        let published: Vec<Video> = self.source.list_records("videos").await?;
        info!(count = published.len(), "Pulled published video records");
        for video in published {
            self.materialize_video(video, force).await?;
        }

        let upcoming: Vec<Video> = self.source.list_records("upcoming").await?;
        info!(count = upcoming.len(), "Pulled upcoming video records");
        for mut video in upcoming {
            video.quarantine = true;
            self.materialize_video(video, force).await?;
        }
        Ok(())
    }

    async fn materialize_video(&self, video: Video, force: bool) -> CaravelResult<()> {
        self.store.put(&video, force)?;
        self.store
            .download_attachment(&video.attachment, force)
            .await?;
        self.store.download_thumbnail(&video, force).await?;
        Ok(())
    }

    /// Pull the comment collection with optional attachments.
    #[instrument(skip(self))]
    pub async fn pull_comments(&self, force: bool) -> CaravelResult<()> {
        let comments: Vec<Comment> = self.source.list_records("comments").await?;
        info!(count = comments.len(), "Pulled comment records");
        for comment in comments {
            self.store.put(&comment, force)?;
            if let Some(attachment) = &comment.attachment {
                self.store.download_attachment(attachment, force).await?;
            }
        }
        Ok(())
    }

    /// Pull profiles of validated accounts.
    ///
    /// The account listing is the authority on which profiles migrate: an
    /// unvalidated or profile-less account is excluded with a notice, not an
    /// error. The account id (the owner's email) overrides whatever email
    /// the profile record carries.
    #[instrument(skip(self))]
    pub async fn pull_profiles(&self, force: bool) -> CaravelResult<()> {
        let accounts = self.source.list_accounts().await?;
        info!(count = accounts.len(), "Pulled account records");
        for account in accounts {
            info!(account = %account.id, "Pulling account");
            let Some(profile_id) = account.profile.filter(|_| account.validated) else {
                info!(account = %account.id, "Skipping account without validated profile");
                continue;
            };
            let mut record = self.source.get_profile_record(&profile_id).await?;
            record
                .as_object_mut()
                .ok_or_else(|| JsonError::new(format!("profile {profile_id}: not an object")))?
                .insert(
                    "email".to_string(),
                    serde_json::Value::String(account.id.clone()),
                );
            let profile: Profile = serde_json::from_value(record)
                .map_err(|e| JsonError::new(format!("profile {profile_id}: {e}")))?;
            self.store.put(&profile, force)?;
        }
        Ok(())
    }
}
