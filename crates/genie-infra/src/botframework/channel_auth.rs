//! Verification of the JWT a Bot Framework channel sends with each activity.
//!
//! Tokens must be RS256-signed by a key from the channel's OpenID metadata,
//! issued by `https://api.botframework.com`, addressed to the bot's app id
//! and unexpired (five minutes of clock skew allowed). Signing keys are
//! cached for a day; an unknown `kid` refreshes them at most every five
//! minutes.

use std::time::Duration;

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::ChannelAuthError;

pub const OPENID_METADATA_URL: &str =
    "https://login.botframework.com/v1/.well-known/openidconfiguration";
pub const CHANNEL_ISSUER: &str = "https://api.botframework.com";

const KEYS_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
const CLOCK_SKEW_SECS: u64 = 5 * 60;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Claims the bot reads from a verified channel token.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelClaims {
    /// Connector endpoint the token was issued for.
    #[serde(default)]
    pub serviceurl: Option<String>,
}

impl ChannelClaims {
    /// Whether the token covers activities from `service_url`. A trailing
    /// `/` is ignored on both sides.
    pub fn allows_service_url(&self, service_url: &str) -> bool {
        self.serviceurl
            .as_deref()
            .is_some_and(|claimed| claimed.trim_end_matches('/') == service_url.trim_end_matches('/'))
    }
}

#[derive(Deserialize)]
struct OpenIdMetadata {
    jwks_uri: String,
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Verifies inbound channel tokens for one bot registration.
pub struct ChannelTokenValidator {
    client: reqwest::Client,
    app_id: String,
    openid_url: String,
    keys: Mutex<Option<CachedKeys>>,
}

impl ChannelTokenValidator {
    pub fn new(app_id: String) -> Result<Self, ChannelAuthError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ChannelAuthError::KeyFetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            app_id,
            openid_url: OPENID_METADATA_URL.to_string(),
            keys: Mutex::new(None),
        })
    }

    /// Override the OpenID metadata endpoint (useful for testing).
    pub fn with_openid_url(mut self, url: String) -> Self {
        self.openid_url = url;
        self
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Verify `token` and return its claims.
    pub async fn validate(&self, token: &str) -> Result<ChannelClaims, ChannelAuthError> {
        let header =
            decode_header(token).map_err(|e| ChannelAuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| ChannelAuthError::InvalidToken("token header has no kid".to_string()))?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.app_id.as_str()]);
        validation.set_issuer(&[CHANNEL_ISSUER]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = CLOCK_SKEW_SECS;

        let data = decode::<ChannelClaims>(token, &key, &validation)
            .map_err(|e| ChannelAuthError::InvalidToken(e.to_string()))?;
        debug!(serviceurl = ?data.claims.serviceurl, "Verified channel token");
        Ok(data.claims)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, ChannelAuthError> {
        let mut cached = self.keys.lock().await;

        let expired = cached
            .as_ref()
            .is_none_or(|c| c.fetched_at.elapsed() >= KEYS_TTL);
        let rotated = cached.as_ref().is_some_and(|c| {
            c.keys.find(kid).is_none() && c.fetched_at.elapsed() >= MIN_REFRESH_INTERVAL
        });
        if expired || rotated {
            let keys = self.fetch_keys().await?;
            debug!(count = keys.keys.len(), "Fetched channel signing keys");
            *cached = Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            });
        }

        let jwk = cached
            .as_ref()
            .and_then(|c| c.keys.find(kid))
            .ok_or_else(|| {
                warn!(%kid, "Channel token signed with unknown key");
                ChannelAuthError::UnknownKey(kid.to_string())
            })?;
        DecodingKey::from_jwk(jwk).map_err(|e| ChannelAuthError::InvalidToken(e.to_string()))
    }

    async fn fetch_keys(&self) -> Result<JwkSet, ChannelAuthError> {
        let metadata: OpenIdMetadata = self.get_json(&self.openid_url).await?;
        self.get_json(&metadata.jwks_uri).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ChannelAuthError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ChannelAuthError::KeyFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChannelAuthError::KeyFetch(format!("HTTP {status} from {url}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ChannelAuthError::KeyFetch(format!("failed to parse {url}: {e}")))
    }
}
