//! Push pipeline: local resource store → destination API.

use caravel_core::{
    Comment, ErrorPolicy, FailureAction, Profile, Resource, Video,
};
use caravel_dest::{AssetStore, DestClient, DestConfig, ThumbnailUpload, TokenBroker, VideoUpload};
use caravel_error::{CaravelError, CaravelErrorKind, CaravelResult, DependencyError};
use caravel_storage::{MappingStore, OwnershipTable, ResourceStore};
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

const PRIVACY_PUBLIC: u8 = 1;
const CATEGORY_EDUCATION: u8 = 13;

/// All records of one kind in canonical push order: non-decreasing order key
/// (publish date for videos, last-modified for comments), ties broken by
/// source id so retries regenerate the same work order.
pub fn ordered_records<R: Resource>(store: &ResourceStore) -> CaravelResult<Vec<R>> {
    let mut records = store.list::<R>()?.collect::<CaravelResult<Vec<_>>>()?;
    records.sort_by(|a, b| {
        a.order_key()
            .cmp(&b.order_key())
            .then_with(|| a.id().cmp(b.id()))
    });
    Ok(records)
}

/// Knobs for one push invocation.
#[derive(Debug, Clone)]
pub struct PushOptions {
    /// What to do when a remote creation fails
    pub policy: ErrorPolicy,
    /// Maximum successful creations per type per invocation; zero means
    /// unbounded
    pub limit: usize,
    /// Push only this source video id (videos only)
    pub video_id: Option<String>,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            policy: ErrorPolicy::Confirm,
            limit: 1,
            video_id: None,
        }
    }
}

/// What the idempotency double-check decided for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncAction {
    /// Mapped and still answering reads remotely
    Skip,
    /// Mapped but vanished remotely; the one sanctioned mapping overwrite
    Recreate,
    /// Never mapped
    Create,
}

/// Resolve the `(mapping has an entry, remote still exists)` pair into an
/// action. The remote probe is what lets a run recover from destination
/// resources deleted behind the mapping store's back.
fn sync_action(mapped: bool, remote_exists: bool) -> SyncAction {
    match (mapped, remote_exists) {
        (true, true) => SyncAction::Skip,
        (true, false) => SyncAction::Recreate,
        (false, _) => SyncAction::Create,
    }
}

/// Destination uuid of a comment's parent video.
///
/// A miss is a dependency failure, not a mapping lookup failure: the comment
/// cannot be created before its video, so the error is never skippable.
fn parent_video<'a>(mapping: &'a MappingStore, comment: &Comment) -> CaravelResult<&'a str> {
    mapping.get(&comment.video).map_err(|_| {
        DependencyError::new("comment", &comment.id, format!("video {}", comment.video)).into()
    })
}

/// Pick the destination actor a video is created under: its resolved owner
/// when the ownership table knows one with a pulled profile, the
/// quarantine-review account for unresolved quarantined videos, the admin
/// otherwise.
fn video_actor(
    ownership: &OwnershipTable,
    profiles: &HashMap<String, Profile>,
    video: &Video,
    quarantine_review_user: Option<&str>,
    admin_user: &str,
) -> String {
    if let Some(username) = ownership.owner(&video.id) {
        if profiles.contains_key(username) {
            return username.to_string();
        }
        if video.quarantine
            && let Some(review) = quarantine_review_user
        {
            return review.to_string();
        }
        warn!(id = %video.id, owner = %username, "Owner has no pulled profile");
    }
    admin_user.to_string()
}

/// Whether a freshly created video is released from the destination's hold.
///
/// Non-admin uploads default to a held state; published videos are released
/// right after creation, quarantine videos stay held until reviewed, and
/// admin uploads are never held in the first place.
fn releases_hold(quarantine: bool, actor: &str, admin_user: &str) -> bool {
    !quarantine && actor != admin_user
}

/// Creates destination resources from the local store, exactly once per
/// source id, in dependency order.
pub struct PushPipeline {
    store: ResourceStore,
    mapping: MappingStore,
    dest: DestClient,
    tokens: TokenBroker,
    assets: AssetStore,
    ownership: OwnershipTable,
    admin_user: String,
    user_password: String,
    quarantine_review_user: Option<String>,
}

impl PushPipeline {
    /// Build a push pipeline over the given state and destination clients.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: ResourceStore,
        mapping: MappingStore,
        dest: DestClient,
        tokens: TokenBroker,
        assets: AssetStore,
        ownership: OwnershipTable,
        config: &DestConfig,
    ) -> Self {
        Self {
            store,
            mapping,
            dest,
            tokens,
            assets,
            ownership,
            admin_user: config.user.clone(),
            user_password: config.password.clone(),
            quarantine_review_user: config.quarantine_review_user.clone(),
        }
    }

    /// Push everything in dependency order: profiles must exist remotely
    /// before the videos and comments that reference them, and videos before
    /// their comments.
    pub async fn push(&mut self, opts: &PushOptions) -> CaravelResult<()> {
        self.push_profiles(opts).await?;
        self.push_videos(opts).await?;
        self.push_comments(opts).await?;
        Ok(())
    }

    fn ordered<R: Resource>(&self) -> CaravelResult<Vec<R>> {
        ordered_records(&self.store)
    }

    /// Resolve a failed item against the policy: `Continue` to the next
    /// record or abort with the original error. Dependency errors never
    /// reach here; they abort unconditionally.
    fn resolve_failure(
        policy: ErrorPolicy,
        err: CaravelError,
        context: &str,
    ) -> CaravelResult<()> {
        error!(context = %context, error = %err, "Push item failed");
        match policy.resolve(&format!("{context}: {err}")) {
            FailureAction::Continue => Ok(()),
            FailureAction::Abort => Err(err),
        }
    }

    fn is_dependency(err: &CaravelError) -> bool {
        matches!(err.kind(), CaravelErrorKind::Dependency(_))
    }

    /// Push profiles in ascending source-id order.
    #[instrument(skip(self, opts))]
    pub async fn push_profiles(&mut self, opts: &PushOptions) -> CaravelResult<usize> {
        let mut profiles = self.ordered::<Profile>()?;
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        let admin_user = self.admin_user.clone();
        let admin_token = self.tokens.token(&admin_user).await?;

        let mut count = 0;
        for profile in profiles {
            let username = profile.username();
            info!(username = %username, "Syncing profile");

            // Existence is probed by derived username rather than trusting
            // the mapping alone: the probe covers both a recorded mapping
            // whose account survived and accounts created outside the
            // mapping store's knowledge (e.g. an interrupted earlier run).
            if self.dest.account_exists(&username).await? {
                if self.mapping.contains(&profile.id) {
                    info!(username = %username, "Profile already migrated");
                } else {
                    info!(username = %username, "Profile already on the destination");
                }
                continue;
            }

            match self.push_one_profile(&profile, &admin_token).await {
                Ok(()) => {
                    count += 1;
                    if opts.limit > 0 && count >= opts.limit {
                        break;
                    }
                }
                Err(e) => {
                    Self::resolve_failure(
                        opts.policy,
                        e,
                        &format!("profile {} ({username})", profile.id),
                    )?;
                }
            }
        }
        info!(count = count, "Pushed profiles");
        Ok(count)
    }

    async fn push_one_profile(&mut self, profile: &Profile, admin_token: &str) -> CaravelResult<()> {
        let username = profile.username();
        let user_id = self
            .dest
            .create_user(
                admin_token,
                &profile.email.to_lowercase(),
                &username,
                &self.user_password,
            )
            .await?;
        self.mapping.set(&profile.id, &user_id)?;

        // Authored content must display the migrated user's identity, so the
        // display name and bio are set under their own token.
        let user_token = self.tokens.token(&username).await?;
        self.dest
            .update_me(&user_token, &profile.display_name(), &profile.bio)
            .await?;
        Ok(())
    }

    /// Push videos in ascending publish-date order.
    #[instrument(skip(self, opts))]
    pub async fn push_videos(&mut self, opts: &PushOptions) -> CaravelResult<usize> {
        let videos = self.ordered::<Video>()?;
        let profiles: HashMap<String, Profile> = self
            .store
            .list::<Profile>()?
            .collect::<CaravelResult<Vec<_>>>()?
            .into_iter()
            .map(|p| (p.username(), p))
            .collect();
        let admin_user = self.admin_user.clone();
        let admin_token = self.tokens.token(&admin_user).await?;

        let mut count = 0;
        for video in videos {
            if let Some(only) = &opts.video_id
                && &video.id != only
            {
                continue;
            }
            info!(id = %video.id, title = %video.title, "Syncing video");

            if self.mapping.contains(&video.id) {
                let uuid = self.mapping.get(&video.id)?.to_string();
                let exists = self.dest.video_exists(&admin_token, &uuid).await?;
                match sync_action(true, exists) {
                    SyncAction::Skip => {
                        info!(id = %video.id, uuid = %uuid, "Video already migrated");
                        continue;
                    }
                    _ => {
                        warn!(id = %video.id, uuid = %uuid, "Mapped video missing remotely, recreating");
                    }
                }
            }

            let actor = video_actor(
                &self.ownership,
                &profiles,
                &video,
                self.quarantine_review_user.as_deref(),
                &self.admin_user,
            );
            match self.push_one_video(&video, &actor, &admin_token).await {
                Ok(()) => {
                    count += 1;
                    if opts.limit > 0 && count >= opts.limit {
                        break;
                    }
                }
                Err(e) => {
                    Self::resolve_failure(
                        opts.policy,
                        e,
                        &format!("video {} ({})", video.id, video.title),
                    )?;
                }
            }
        }
        info!(count = count, "Pushed videos");
        Ok(count)
    }

    async fn push_one_video(
        &mut self,
        video: &Video,
        actor: &str,
        admin_token: &str,
    ) -> CaravelResult<()> {
        info!(id = %video.id, actor = %actor, "Uploading as actor");
        let token = self.tokens.token(actor).await?;
        let channel_id = self.dest.channel_id(&token).await?;

        let thumbnail_path = self.store.thumbnail_path(&video.id);
        let upload = VideoUpload {
            name: video.title.clone(),
            channel_id,
            // The destination rejects empty descriptions.
            description: if video.description.is_empty() {
                video.title.clone()
            } else {
                video.description.clone()
            },
            privacy: PRIVACY_PUBLIC,
            category: CATEGORY_EDUCATION,
            tags: video.tags(),
            publish_date: video.publish_date,
            video_path: self.store.attachment_path(&video.attachment),
            video_filename: video.attachment.location_filename().to_string(),
            video_mimetype: video.attachment.mimetype.clone(),
            thumbnail: thumbnail_path.exists().then(|| ThumbnailUpload {
                path: thumbnail_path.clone(),
                filename: video.thumbnail_filename(),
            }),
        };

        let uuid = self.dest.upload_video(&token, &upload).await?;
        self.mapping.set(&video.id, &uuid)?;

        if releases_hold(video.quarantine, actor, &self.admin_user) {
            info!(uuid = %uuid, "Releasing video from hold");
            if let Err(e) = self.dest.remove_from_blacklist(admin_token, &uuid).await {
                // The video exists and is mapped; the hold can be lifted
                // manually, so this does not consume the error policy.
                error!(uuid = %uuid, error = %e, "Failed to release video from hold");
            }
        }
        Ok(())
    }

    /// Push comments in ascending last-modified order.
    ///
    /// An unresolved video or profile dependency aborts the run: a comment
    /// cannot exist without its parents, and silently dropping it would
    /// corrupt the migration.
    #[instrument(skip(self, opts))]
    pub async fn push_comments(&mut self, opts: &PushOptions) -> CaravelResult<usize> {
        let comments = self.ordered::<Comment>()?;
        let profiles: HashMap<String, Profile> = self
            .store
            .list::<Profile>()?
            .collect::<CaravelResult<Vec<_>>>()?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();
        let admin_user = self.admin_user.clone();
        let admin_token = self.tokens.token(&admin_user).await?;

        let mut count = 0;
        for comment in comments {
            let video_uuid = parent_video(&self.mapping, &comment)?.to_string();

            if self.mapping.contains(&comment.id) {
                let thread_id = self.mapping.get(&comment.id)?.to_string();
                let exists = self
                    .dest
                    .comment_thread_exists(&admin_token, &video_uuid, &thread_id)
                    .await?;
                if sync_action(true, exists) == SyncAction::Skip {
                    info!(id = %comment.id, thread = %thread_id, "Comment already migrated");
                    continue;
                }
            }

            let profile = profiles.get(&comment.profile).ok_or_else(|| {
                DependencyError::new(
                    "comment",
                    &comment.id,
                    format!("profile {}", comment.profile),
                )
            })?;
            let username = profile.username();

            match self
                .push_one_comment(&comment, &video_uuid, &username)
                .await
            {
                Ok(()) => {
                    count += 1;
                    if opts.limit > 0 && count >= opts.limit {
                        break;
                    }
                }
                Err(e) if Self::is_dependency(&e) => return Err(e),
                Err(e) => {
                    Self::resolve_failure(opts.policy, e, &format!("comment {}", comment.id))?;
                }
            }
        }
        info!(count = count, "Pushed comments");
        Ok(count)
    }

    async fn push_one_comment(
        &mut self,
        comment: &Comment,
        video_uuid: &str,
        username: &str,
    ) -> CaravelResult<()> {
        let token = self.tokens.token(username).await?;
        let thread_id = self
            .dest
            .create_comment_thread(&token, video_uuid, &comment.comment)
            .await?;
        self.mapping.set(&comment.id, &thread_id)?;

        if let Some(attachment) = &comment.attachment {
            self.assets
                .put(
                    &token,
                    video_uuid,
                    &thread_id,
                    attachment.location_filename(),
                    &self.store.attachment_path(attachment),
                )
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_core::Attachment;
    use tempfile::TempDir;

    fn video(id: &str, quarantine: bool) -> Video {
        Video {
            id: id.to_string(),
            title: format!("Video {id}"),
            description: String::new(),
            duration: 60,
            grade: "CP".to_string(),
            keywords: vec![],
            profile: "p1".to_string(),
            creation_date: 1,
            publish_date: 2,
            last_modified: 3,
            schema: 1,
            thumbnail: String::new(),
            attachment: Attachment {
                filename: "v.mp4".to_string(),
                hash: "aaaa".to_string(),
                location: "https://example.org/v.mp4".to_string(),
                mimetype: "video/mp4".to_string(),
                size: 1,
            },
            quarantine,
        }
    }

    fn profile(id: &str, email: &str) -> Profile {
        Profile {
            id: id.to_string(),
            name: "Jean".to_string(),
            bio: String::new(),
            email: email.to_string(),
            schema: 1,
            last_modified: 0,
        }
    }

    fn comment(id: &str, video: &str) -> Comment {
        Comment {
            id: id.to_string(),
            video: video.to_string(),
            profile: "p1".to_string(),
            comment: "Bravo !".to_string(),
            schema: 1,
            last_modified: 5,
            attachment: None,
        }
    }

    fn profile_index(entries: &[(&str, &str)]) -> HashMap<String, Profile> {
        entries
            .iter()
            .map(|(username, email)| (username.to_string(), profile("p1", email)))
            .collect()
    }

    fn ownership(entries: &[(&str, &str)]) -> OwnershipTable {
        let dir = TempDir::new().unwrap();
        let mut table = OwnershipTable::load(dir.path().join("owners.json")).unwrap();
        for (video_id, username) in entries {
            table.insert(*video_id, *username);
        }
        table
    }

    #[test]
    fn mapped_and_alive_records_are_never_recreated() {
        assert_eq!(sync_action(true, true), SyncAction::Skip);
    }

    #[test]
    fn mapped_but_vanished_records_are_recreated() {
        assert_eq!(sync_action(true, false), SyncAction::Recreate);
    }

    #[test]
    fn unmapped_records_are_created() {
        assert_eq!(sync_action(false, false), SyncAction::Create);
        assert_eq!(sync_action(false, true), SyncAction::Create);
    }

    #[test]
    fn comment_with_unmapped_video_fails_before_any_remote_call() {
        let dir = TempDir::new().unwrap();
        let mapping =
            MappingStore::open(dir.path().join("mapping.json"), "https://dest/api/v1").unwrap();

        let err = parent_video(&mapping, &comment("c1", "v1")).unwrap_err();
        assert!(matches!(err.kind(), CaravelErrorKind::Dependency(_)));
    }

    #[test]
    fn comment_with_mapped_video_resolves_to_its_uuid() {
        let dir = TempDir::new().unwrap();
        let mut mapping =
            MappingStore::open(dir.path().join("mapping.json"), "https://dest/api/v1").unwrap();
        mapping.set("v1", "uuid-1").unwrap();

        assert_eq!(parent_video(&mapping, &comment("c1", "v1")).unwrap(), "uuid-1");
    }

    #[test]
    fn resolved_owner_with_pulled_profile_is_the_actor() {
        let owners = ownership(&[("v1", "jean.paul.dupont")]);
        let profiles = profile_index(&[("jean.paul.dupont", "Jean-Paul.Dupont@example.org")]);

        let actor = video_actor(&owners, &profiles, &video("v1", false), Some("review"), "root");
        assert_eq!(actor, "jean.paul.dupont");
    }

    #[test]
    fn quarantined_video_with_unknown_owner_goes_to_review_account() {
        let owners = ownership(&[("v1", "missing.profile")]);
        let profiles = profile_index(&[]);

        let actor = video_actor(&owners, &profiles, &video("v1", true), Some("review"), "root");
        assert_eq!(actor, "review");
    }

    #[test]
    fn published_video_with_unknown_owner_falls_back_to_admin() {
        let owners = ownership(&[("v1", "missing.profile")]);
        let profiles = profile_index(&[]);

        let actor = video_actor(&owners, &profiles, &video("v1", false), Some("review"), "root");
        assert_eq!(actor, "root");
    }

    #[test]
    fn unowned_video_falls_back_to_admin() {
        let owners = ownership(&[]);
        let profiles = profile_index(&[("jean.paul.dupont", "Jean-Paul.Dupont@example.org")]);

        let actor = video_actor(&owners, &profiles, &video("v1", true), None, "root");
        assert_eq!(actor, "root");
    }

    #[test]
    fn published_non_admin_uploads_are_released() {
        assert!(releases_hold(false, "jean.paul.dupont", "root"));
    }

    #[test]
    fn quarantine_uploads_stay_held_for_every_actor() {
        assert!(!releases_hold(true, "jean.paul.dupont", "root"));
        assert!(!releases_hold(true, "review", "root"));
        assert!(!releases_hold(true, "root", "root"));
    }

    #[test]
    fn admin_uploads_are_never_held() {
        assert!(!releases_hold(false, "root", "root"));
    }
}
