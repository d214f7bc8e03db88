//! Destination API client.

use crate::VideoUpload;
use caravel_error::{ApiError, CaravelResult, HttpError, JsonError};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

/// Connection settings for the destination system.
#[derive(Debug, Clone, Deserialize)]
pub struct DestConfig {
    /// Base URL, without the `/api/v1` suffix
    pub url: String,
    /// Admin user performing the migration
    pub user: String,
    /// Migration password, shared by the admin and all created users
    #[serde(default)]
    pub password: String,
    /// Account receiving quarantined videos whose owner is unresolved
    pub quarantine_review_user: Option<String>,
}

impl DestConfig {
    /// API root: `{base}/api/v1`.
    ///
    /// Also the endpoint key scoping the identity mapping store.
    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.url)
    }
}

/// Client for the destination video-hosting API.
///
/// Holds no tokens itself; callers obtain per-actor tokens from a
/// [`crate::TokenBroker`] and pass them in, so every call is explicit about
/// which actor it runs as.
#[derive(Debug, Clone)]
pub struct DestClient {
    client: reqwest::Client,
    api_url: String,
}

impl DestClient {
    /// Create a client for the configured destination.
    pub fn new(config: &DestConfig) -> Self {
        debug!(url = %config.url, "Creating destination client");
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_url, endpoint)
    }

    async fn fail<T>(url: String, response: reqwest::Response) -> CaravelResult<T> {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::new(url, status, body).into())
    }

    /// Whether an account with this username already exists.
    ///
    /// Probed unauthenticated, before user creation, to catch accounts the
    /// mapping store does not know about.
    #[instrument(skip(self))]
    pub async fn account_exists(&self, username: &str) -> CaravelResult<bool> {
        let url = self.url(&format!("accounts/{username}"));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        Ok(response.status().is_success())
    }

    /// Create a destination user for a migrated profile; returns the new
    /// user id.
    ///
    /// Users are created with the User role and unlimited quotas.
    #[instrument(skip(self, token, password))]
    pub async fn create_user(
        &self,
        token: &str,
        email: &str,
        username: &str,
        password: &str,
    ) -> CaravelResult<String> {
        let url = self.url("users");
        let params = [
            ("email", email),
            ("username", username),
            ("password", password),
            ("role", "2"),
            ("videoQuota", "-1"),
            ("videoQuotaDaily", "-1"),
        ];
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .form(&params)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("POST {url}: {e}")))?;
        if !response.status().is_success() {
            return Self::fail(url, response).await;
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("POST {url}: {e}")))?;
        let id = body["user"]["id"]
            .as_i64()
            .ok_or_else(|| JsonError::new(format!("POST {url}: response missing user.id")))?;
        info!(username = %username, id = id, "Created destination user");
        Ok(id.to_string())
    }

    /// Update the authenticated user's display name and bio.
    #[instrument(skip(self, token, bio))]
    pub async fn update_me(&self, token: &str, display_name: &str, bio: &str) -> CaravelResult<()> {
        let url = self.url("users/me");
        let params = [("displayName", display_name), ("bio", bio)];
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .form(&params)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("PUT {url}: {e}")))?;
        if !response.status().is_success() {
            return Self::fail(url, response).await;
        }
        Ok(())
    }

    /// First video channel id of the authenticated user.
    #[instrument(skip(self, token))]
    pub async fn channel_id(&self, token: &str) -> CaravelResult<i64> {
        let url = self.url("users/me");
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        if !response.status().is_success() {
            return Self::fail(url, response).await;
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("GET {url}: {e}")))?;
        body["videoChannels"][0]["id"].as_i64().ok_or_else(|| {
            JsonError::new(format!("GET {url}: response missing videoChannels[0].id")).into()
        })
    }

    /// Whether a video with this uuid still exists on the destination.
    ///
    /// Anything other than a success answer counts as "needs recreation".
    #[instrument(skip(self, token))]
    pub async fn video_exists(&self, token: &str, uuid: &str) -> CaravelResult<bool> {
        let url = self.url(&format!("videos/{uuid}"));
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        Ok(response.status().is_success())
    }

    /// Upload a video as the actor holding `token`; returns the new uuid.
    #[instrument(skip(self, token, upload), fields(name = %upload.name))]
    pub async fn upload_video(&self, token: &str, upload: &VideoUpload) -> CaravelResult<String> {
        let url = self.url("videos/upload");

        let mut form = Form::new()
            .text("name", upload.name.clone())
            .text("channelId", upload.channel_id.to_string())
            .text("description", upload.description.clone())
            .text("privacy", upload.privacy.to_string())
            .text("commentsEnabled", "true")
            .text("category", upload.category.to_string());
        for tag in &upload.tags {
            form = form.text("tags[]", tag.clone());
        }
        if let Some(published_at) = upload.originally_published_at() {
            form = form.text("originallyPublishedAt", published_at);
        }

        let file = tokio::fs::File::open(&upload.video_path).await.map_err(|e| {
            HttpError::new(format!("open {}: {e}", upload.video_path.display()))
        })?;
        let length = file
            .metadata()
            .await
            .map_err(|e| HttpError::new(format!("stat {}: {e}", upload.video_path.display())))?
            .len();
        let media = Part::stream_with_length(reqwest::Body::from(file), length)
            .file_name(upload.video_filename.clone())
            .mime_str(&upload.video_mimetype)
            .map_err(|e| HttpError::new(format!("media part: {e}")))?;
        form = form.part("videofile", media);

        if let Some(thumbnail) = &upload.thumbnail {
            let bytes = tokio::fs::read(&thumbnail.path).await.map_err(|e| {
                HttpError::new(format!("read {}: {e}", thumbnail.path.display()))
            })?;
            for field in ["previewfile", "thumbnailfile"] {
                let part = Part::bytes(bytes.clone())
                    .file_name(thumbnail.filename.clone())
                    .mime_str("image/jpeg")
                    .map_err(|e| HttpError::new(format!("thumbnail part: {e}")))?;
                form = form.part(field, part);
            }
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("POST {url}: {e}")))?;
        if !response.status().is_success() {
            return Self::fail(url, response).await;
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("POST {url}: {e}")))?;
        let uuid = body["video"]["uuid"]
            .as_str()
            .ok_or_else(|| JsonError::new(format!("POST {url}: response missing video.uuid")))?;
        info!(name = %upload.name, uuid = %uuid, "Uploaded video");
        Ok(uuid.to_string())
    }

    /// Lift the destination's hold on a freshly created video.
    ///
    /// Videos created by non-admin actors default to a held/blacklisted
    /// state; non-quarantine videos are released right after creation.
    #[instrument(skip(self, admin_token))]
    pub async fn remove_from_blacklist(&self, admin_token: &str, uuid: &str) -> CaravelResult<()> {
        let url = self.url(&format!("videos/{uuid}/blacklist"));
        let response = self
            .client
            .delete(&url)
            .bearer_auth(admin_token)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("DELETE {url}: {e}")))?;
        if !response.status().is_success() {
            return Self::fail(url, response).await;
        }
        Ok(())
    }

    /// Create a top-level comment thread on a video as the actor holding
    /// `token`; returns the thread id.
    #[instrument(skip(self, token, text))]
    pub async fn create_comment_thread(
        &self,
        token: &str,
        video_uuid: &str,
        text: &str,
    ) -> CaravelResult<String> {
        let url = self.url(&format!("videos/{video_uuid}/comment-threads"));
        let params = [("text", text)];
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .form(&params)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("POST {url}: {e}")))?;
        if !response.status().is_success() {
            return Self::fail(url, response).await;
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("POST {url}: {e}")))?;
        let id = body["comment"]["id"]
            .as_i64()
            .ok_or_else(|| JsonError::new(format!("POST {url}: response missing comment.id")))?;
        info!(video = %video_uuid, thread = id, "Created comment thread");
        Ok(id.to_string())
    }

    /// Whether a comment thread still exists on the destination.
    #[instrument(skip(self, token))]
    pub async fn comment_thread_exists(
        &self,
        token: &str,
        video_uuid: &str,
        thread_id: &str,
    ) -> CaravelResult<bool> {
        let url = self.url(&format!("videos/{video_uuid}/comment-threads/{thread_id}"));
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        if !response.status().is_success() {
            warn!(video = %video_uuid, thread = %thread_id, "Mapped comment thread missing remotely");
        }
        Ok(response.status().is_success())
    }
}
