//! Bot Framework activity schema (the subset the bot reads and writes).

use serde::{Deserialize, Serialize};

/// Activity type discriminator. Types the bot does not handle decode as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    Message,
    ConversationUpdate,
    #[serde(other)]
    Other,
}

/// A user or bot account on a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
}

/// An inbound or outbound Bot Framework activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_added: Option<Vec<ChannelAccount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
}

impl Activity {
    pub fn from_id(&self) -> Option<&str> {
        self.from.as_ref().map(|a| a.id.as_str())
    }

    pub fn recipient_id(&self) -> Option<&str> {
        self.recipient.as_ref().map(|a| a.id.as_str())
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation.as_ref().map(|c| c.id.as_str())
    }

    pub fn members_added(&self) -> &[ChannelAccount] {
        self.members_added.as_deref().unwrap_or_default()
    }

    /// Build a markdown message replying to this activity, with the sender
    /// and recipient swapped.
    pub fn reply(&self, text: impl Into<String>) -> Activity {
        Activity {
            kind: ActivityType::Message,
            id: None,
            service_url: self.service_url.clone(),
            channel_id: self.channel_id.clone(),
            from: self.recipient.clone(),
            recipient: self.from.clone(),
            conversation: self.conversation.clone(),
            text: Some(text.into()),
            text_format: Some("markdown".to_string()),
            locale: self.locale.clone(),
            members_added: None,
            reply_to_id: self.id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inbound() -> Activity {
        serde_json::from_value(json!({
            "type": "message",
            "id": "act-1",
            "serviceUrl": "https://smba.trafficmanager.net/amer/",
            "channelId": "msteams",
            "from": {"id": "user-1", "name": "Dana"},
            "recipient": {"id": "bot-1", "name": "Genie"},
            "conversation": {"id": "conv-1"},
            "text": "total sales by region"
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_message_activity() {
        let activity = inbound();
        assert_eq!(activity.kind, ActivityType::Message);
        assert_eq!(activity.from_id(), Some("user-1"));
        assert_eq!(activity.recipient_id(), Some("bot-1"));
        assert_eq!(activity.conversation_id(), Some("conv-1"));
        assert!(activity.members_added().is_empty());
    }

    #[test]
    fn test_decode_unknown_type() {
        let activity: Activity =
            serde_json::from_value(json!({"type": "typing", "id": "x"})).unwrap();
        assert_eq!(activity.kind, ActivityType::Other);
    }

    #[test]
    fn test_reply_swaps_accounts() {
        let reply = inbound().reply("| a |");
        assert_eq!(reply.kind, ActivityType::Message);
        assert_eq!(reply.from_id(), Some("bot-1"));
        assert_eq!(reply.recipient_id(), Some("user-1"));
        assert_eq!(reply.reply_to_id.as_deref(), Some("act-1"));

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["type"], json!("message"));
        assert_eq!(value["textFormat"], json!("markdown"));
        assert!(value.get("membersAdded").is_none());
    }
}
