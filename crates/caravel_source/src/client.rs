//! Source API client.

use caravel_error::{ApiError, CaravelResult, HttpError, JsonError};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Connection settings for the source system.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Base URL, without the `/v1` suffix
    pub url: String,
    /// Bucket holding the resource collections
    pub bucket: String,
    /// Basic-auth user
    pub user: String,
    /// Basic-auth password
    #[serde(default)]
    pub password: String,
}

/// A source account, as returned by the account-listing endpoint.
///
/// The account id is the owner's email. Accounts are migrated only when they
/// are validated and carry a completed profile.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account id; the owner's email
    pub id: String,
    /// Whether the account completed validation
    #[serde(default)]
    pub validated: bool,
    /// Source id of the account's profile record, when one exists
    #[serde(default)]
    pub profile: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Data<T> {
    data: T,
}

/// Read-only client for the source system.
#[derive(Debug, Clone)]
pub struct SourceClient {
    client: reqwest::Client,
    config: SourceConfig,
}

impl SourceClient {
    /// Create a client for the configured source endpoint.
    pub fn new(config: SourceConfig) -> Self {
        debug!(url = %config.url, bucket = %config.bucket, "Creating source client");
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> CaravelResult<T> {
        let url = format!("{}/v1/{}", self.config.url, endpoint);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::new(url, status, body).into());
        }
        let wrapper: Data<T> = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("GET {url}: {e}")))?;
        Ok(wrapper.data)
    }

    /// List all records of a collection in the configured bucket.
    #[instrument(skip(self))]
    pub async fn list_records<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> CaravelResult<Vec<T>> {
        self.get(&format!(
            "buckets/{}/collections/{collection}/records",
            self.config.bucket
        ))
        .await
    }

    /// List all source accounts.
    #[instrument(skip(self))]
    pub async fn list_accounts(&self) -> CaravelResult<Vec<Account>> {
        self.get("accounts").await
    }

    /// Fetch one profile record by source id.
    #[instrument(skip(self))]
    pub async fn get_profile_record(&self, id: &str) -> CaravelResult<serde_json::Value> {
        self.get(&format!(
            "buckets/{}/collections/profiles/records/{id}",
            self.config.bucket
        ))
        .await
    }
}
