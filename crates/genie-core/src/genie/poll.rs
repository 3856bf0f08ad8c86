//! Poll loop: fetch a message until its status is terminal.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use genie_types::error::GenieError;
use genie_types::genie::{GenieMessage, MessageStatus};

use super::api::GenieApi;

/// Fixed-interval polling bounded by an overall timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollConfig {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20 * 60);
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Poll `get_message` until the message reaches a terminal status.
///
/// Returns the completed message. `FAILED`, `CANCELLED` and
/// `QUERY_RESULT_EXPIRED` become [`GenieError::MessageFailed`]; a message
/// without a status is [`GenieError::MissingField`]; running past
/// `config.timeout` is [`GenieError::Timeout`]. A timeout too large to add
/// to the current instant polls without a deadline.
pub async fn wait_for_message<A: GenieApi>(
    api: &A,
    conversation_id: &str,
    message_id: &str,
    config: &PollConfig,
) -> Result<GenieMessage, GenieError> {
    let deadline = Instant::now().checked_add(config.timeout);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let message = api.get_message(conversation_id, message_id).await?;
        let status = message.status.ok_or(GenieError::MissingField("status"))?;

        match status {
            MessageStatus::Completed => {
                debug!(%conversation_id, %message_id, attempts, "Genie message completed");
                return Ok(message);
            }
            MessageStatus::Failed | MessageStatus::Cancelled | MessageStatus::QueryResultExpired => {
                let reason = message.error_text().unwrap_or("no error detail").to_string();
                return Err(GenieError::MessageFailed {
                    status: status.to_string(),
                    message: reason,
                });
            }
            pending => {
                debug!(%conversation_id, %message_id, status = %pending, "Genie message pending");
            }
        }

        if let Some(deadline) = deadline {
            let next = Instant::now().checked_add(config.interval);
            if next.is_none_or(|next| next > deadline) {
                return Err(GenieError::Timeout(config.timeout.as_secs()));
            }
        }
        tokio::time::sleep(config.interval).await;
    }
}
