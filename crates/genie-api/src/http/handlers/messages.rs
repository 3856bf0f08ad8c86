//! Bot Framework messaging endpoint.
//!
//! Each POST carries one activity. Messages run one bot turn and the
//! markdown answer is posted back through the connector; conversation
//! updates greet new members. Replies are sent before the request returns,
//! so the channel sees 201 only once delivery succeeded. When channel
//! tokens are verified, the activity's `serviceUrl` must be the one the
//! token was issued for.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, info, warn};

use genie_types::activity::{Activity, ActivityType};

use crate::http::error::AppError;
use crate::http::extractors::auth::ChannelAuth;
use crate::http::extractors::content_type::JsonContentType;
use crate::state::AppState;

/// POST /api/messages - Receive an activity from the channel.
pub async fn receive_activity(
    State(state): State<AppState>,
    _json: JsonContentType,
    auth: ChannelAuth,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let activity: Activity = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid activity: {e}")))?;

    if !auth.permits_service_url(activity.service_url.as_deref()) {
        warn!(service_url = ?activity.service_url, "Activity serviceUrl not covered by channel token");
        return Err(AppError::Unauthorized(
            "Activity serviceUrl does not match the channel token".to_string(),
        ));
    }

    match activity.kind {
        ActivityType::Message => on_message(&state, &activity).await?,
        ActivityType::ConversationUpdate => on_conversation_update(&state, &activity).await?,
        ActivityType::Other => {
            debug!(id = ?activity.id, "Ignoring unsupported activity type");
        }
    }

    Ok(StatusCode::CREATED)
}

async fn on_message(state: &AppState, activity: &Activity) -> Result<(), AppError> {
    let user_id = activity
        .from_id()
        .ok_or_else(|| AppError::BadRequest("Message activity has no from.id".to_string()))?;
    let text = activity.text.as_deref().unwrap_or_default();
    info!(%user_id, channel = ?activity.channel_id, "Received message");

    let reply = state.bot.on_message(user_id, text).await;
    state.connector.reply_to(activity, &reply).await?;
    Ok(())
}

async fn on_conversation_update(state: &AppState, activity: &Activity) -> Result<(), AppError> {
    let greetings = state
        .bot
        .on_members_added(activity.members_added(), activity.recipient_id());
    for greeting in greetings {
        state.connector.reply_to(activity, &greeting).await?;
    }
    Ok(())
}
