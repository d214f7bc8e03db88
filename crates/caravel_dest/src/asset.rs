//! Comment attachment storage client.

use caravel_error::{ApiError, CaravelResult, HttpError};
use std::path::Path;
use tracing::{info, instrument};

/// Client for the separate asset-storage service holding comment
/// attachments, keyed by `/{videoId}/{commentId}/{filename}`.
#[derive(Debug, Clone)]
pub struct AssetStore {
    client: reqwest::Client,
    url: String,
}

impl AssetStore {
    /// Create a client for the asset store at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Upload a cached attachment under the video/comment it belongs to.
    #[instrument(skip(self, token, path))]
    pub async fn put(
        &self,
        token: &str,
        video_uuid: &str,
        comment_id: &str,
        filename: &str,
        path: &Path,
    ) -> CaravelResult<()> {
        let url = format!("{}/{video_uuid}/{comment_id}/{filename}", self.url);
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| HttpError::new(format!("open {}: {e}", path.display())))?;
        let response = self
            .client
            .put(&url)
            .bearer_auth(token)
            .body(reqwest::Body::from(file))
            .send()
            .await
            .map_err(|e| HttpError::new(format!("PUT {url}: {e}")))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::new(url, status, body).into());
        }
        info!(url = %url, "Pushed comment attachment");
        Ok(())
    }
}
