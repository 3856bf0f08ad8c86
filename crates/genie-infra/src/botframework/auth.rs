//! OAuth client-credentials token for calling the Bot Framework connector.
//!
//! Tokens are fetched with the app id/password and cached until shortly
//! before they expire. The password is a [`SecretString`] and never logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::ConnectorError;

pub const TOKEN_ENDPOINT: &str =
    "https://login.microsoftonline.com/botframework.com/oauth2/v2.0/token";
pub const TOKEN_SCOPE: &str = "https://api.botframework.com/.default";

/// Refresh this long before the server-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(5 * 60);

/// Bot registration credentials (`MicrosoftAppId` / `MicrosoftAppPassword`).
#[derive(Debug)]
pub struct BotCredentials {
    pub app_id: String,
    pub app_password: SecretString,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

struct CachedToken {
    token: SecretString,
    refresh_at: Instant,
}

/// Fetches and caches the connector bearer token.
pub struct TokenCache {
    client: reqwest::Client,
    credentials: BotCredentials,
    endpoint: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(client: reqwest::Client, credentials: BotCredentials) -> Self {
        Self {
            client,
            credentials,
            endpoint: TOKEN_ENDPOINT.to_string(),
            cached: Mutex::new(None),
        }
    }

    /// Override the token endpoint (useful for testing).
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn app_id(&self) -> &str {
        &self.credentials.app_id
    }

    /// A valid access token, fetching a new one when the cached token is
    /// missing or about to expire.
    pub async fn token(&self) -> Result<String, ConnectorError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| Instant::now() < t.refresh_at) {
            return Ok(token.token.expose_secret().to_string());
        }

        let fresh = self.fetch().await?;
        let access_token = fresh.access_token.clone();
        let lifetime = Duration::from_secs(fresh.expires_in).saturating_sub(EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            token: SecretString::from(fresh.access_token),
            refresh_at: Instant::now() + lifetime,
        });
        debug!(expires_in = fresh.expires_in, "Fetched connector token");
        Ok(access_token)
    }

    async fn fetch(&self) -> Result<TokenResponse, ConnectorError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.app_id.as_str()),
            ("client_secret", self.credentials.app_password.expose_secret()),
            ("scope", TOKEN_SCOPE),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| ConnectorError::Token(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Token(format!("HTTP {status}: {body}")));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| ConnectorError::Token(format!("failed to parse token response: {e}")))
    }
}
