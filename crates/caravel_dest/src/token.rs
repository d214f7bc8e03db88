//! Per-actor OAuth2 token brokerage.

use caravel_error::{ApiError, CaravelResult, HttpError, JsonError};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Deserialize)]
struct OauthClient {
    client_id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Fetch-once-reuse cache of destination access tokens, one per actor.
///
/// The OAuth client credentials are discovered on first use; each username's
/// password-grant token is exchanged once and reused for the process
/// lifetime. Migrated users all share the migration password configured for
/// the destination.
pub struct TokenBroker {
    client: reqwest::Client,
    api_url: String,
    password: String,
    oauth: Option<OauthClient>,
    tokens: HashMap<String, String>,
}

impl TokenBroker {
    /// Create a broker for the given API root (`{base}/api/v1`).
    pub fn new(api_url: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            password: password.into(),
            oauth: None,
            tokens: HashMap::new(),
        }
    }

    async fn oauth_client(&mut self) -> CaravelResult<OauthClient> {
        if let Some(oauth) = &self.oauth {
            return Ok(oauth.clone());
        }
        let url = format!("{}/oauth-clients/local", self.api_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("GET {url}: {e}")))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::new(url, status, body).into());
        }
        let oauth: OauthClient = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("GET {url}: {e}")))?;
        debug!("Discovered destination OAuth client");
        self.oauth = Some(oauth.clone());
        Ok(oauth)
    }

    /// Access token for `username`, exchanging one if not already cached.
    #[instrument(skip(self))]
    pub async fn token(&mut self, username: &str) -> CaravelResult<String> {
        if let Some(token) = self.tokens.get(username) {
            return Ok(token.clone());
        }
        let password = self.password.clone();
        let oauth = self.oauth_client().await?;
        let params = [
            ("client_id", oauth.client_id.as_str()),
            ("client_secret", oauth.client_secret.as_str()),
            ("grant_type", "password"),
            ("response_type", "code"),
            ("username", username),
            ("password", password.as_str()),
        ];
        let url = format!("{}/users/token", self.api_url);
        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(|e| HttpError::new(format!("POST {url}: {e}")))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::new(format!("{url} for {username}"), status, body).into());
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| JsonError::new(format!("POST {url}: {e}")))?;
        info!(username = %username, "Obtained destination token");
        self.tokens
            .insert(username.to_string(), token.access_token.clone());
        Ok(token.access_token)
    }
}
