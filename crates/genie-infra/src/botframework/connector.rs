//! ConnectorClient -- posts activities back to the channel's connector service.
//!
//! Replies go to `{serviceUrl}/v3/conversations/{conversationId}/activities/{replyToId}`.
//! When bot credentials are configured each call carries a bearer token from
//! [`TokenCache`]; without credentials (local emulator) calls are anonymous.

use std::time::Duration;

use reqwest::Url;
use tracing::{debug, warn};

use genie_types::activity::Activity;

use super::auth::{BotCredentials, TokenCache};
use super::ConnectorError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound side of the channel adapter.
pub struct ConnectorClient {
    client: reqwest::Client,
    auth: Option<TokenCache>,
}

impl ConnectorClient {
    pub fn new(credentials: Option<BotCredentials>) -> Result<Self, ConnectorError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConnectorError::Transport(format!("failed to build HTTP client: {e}")))?;
        let auth = credentials.map(|c| TokenCache::new(client.clone(), c));
        Ok(Self { client, auth })
    }

    /// Use a preconfigured token cache (useful for testing).
    pub fn with_token_cache(mut self, cache: TokenCache) -> Self {
        self.auth = Some(cache);
        self
    }

    /// Whether outbound calls are authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Send `text` as a markdown reply to `incoming`.
    pub async fn reply_to(&self, incoming: &Activity, text: &str) -> Result<(), ConnectorError> {
        self.send_activity(&incoming.reply(text)).await
    }

    /// Post an activity to its conversation.
    pub async fn send_activity(&self, activity: &Activity) -> Result<(), ConnectorError> {
        let url = activity_url(activity)?;
        debug!(%url, "Sending activity");

        let mut request = self.client.post(url).json(activity);
        if let Some(auth) = &self.auth {
            request = request.bearer_auth(auth.token().await?);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConnectorError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "Connector rejected activity");
            return Err(ConnectorError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Build the connector URL for an activity. Each id is pushed as one
/// percent-encoded path segment, so a `/` or `#` inside it stays put.
fn activity_url(activity: &Activity) -> Result<Url, ConnectorError> {
    let service_url = activity
        .service_url
        .as_deref()
        .ok_or(ConnectorError::MissingField("serviceUrl"))?;
    let conversation_id = activity
        .conversation_id()
        .ok_or(ConnectorError::MissingField("conversation.id"))?;

    let mut url = Url::parse(service_url)
        .map_err(|_| ConnectorError::InvalidServiceUrl(service_url.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ConnectorError::InvalidServiceUrl(service_url.to_string()))?;
        segments
            .pop_if_empty()
            .extend(["v3", "conversations", conversation_id, "activities"]);
        if let Some(reply_to) = activity.reply_to_id.as_deref() {
            segments.push(reply_to);
        }
    }
    Ok(url)
}
