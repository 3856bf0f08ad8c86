//! Wire types for the Databricks Genie and SQL statement execution APIs.
//!
//! Every field the bot relies on is optional at the serde level. A response
//! that omits one decodes fine and the caller turns the gap into
//! [`GenieError::MissingField`](crate::error::GenieError::MissingField).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a Genie message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageStatus {
    Submitted,
    FetchingMetadata,
    FilteringContext,
    AskingAi,
    PendingWarehouse,
    ExecutingQuery,
    Failed,
    Completed,
    Cancelled,
    QueryResultExpired,
    #[serde(other)]
    Unknown,
}

impl MessageStatus {
    /// Whether polling should stop at this status.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MessageStatus::Completed
                | MessageStatus::Failed
                | MessageStatus::Cancelled
                | MessageStatus::QueryResultExpired
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::Submitted => "SUBMITTED",
            MessageStatus::FetchingMetadata => "FETCHING_METADATA",
            MessageStatus::FilteringContext => "FILTERING_CONTEXT",
            MessageStatus::AskingAi => "ASKING_AI",
            MessageStatus::PendingWarehouse => "PENDING_WAREHOUSE",
            MessageStatus::ExecutingQuery => "EXECUTING_QUERY",
            MessageStatus::Failed => "FAILED",
            MessageStatus::Completed => "COMPLETED",
            MessageStatus::Cancelled => "CANCELLED",
            MessageStatus::QueryResultExpired => "QUERY_RESULT_EXPIRED",
            MessageStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for starting a conversation or posting a follow-up.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest<'a> {
    pub content: &'a str,
}

/// A question/answer unit inside a Genie conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenieMessage {
    pub id: Option<String>,
    /// Newer API revisions send the id under this name as well.
    pub message_id: Option<String>,
    pub conversation_id: Option<String>,
    pub space_id: Option<String>,
    pub content: Option<String>,
    pub status: Option<MessageStatus>,
    pub attachments: Option<Vec<GenieAttachment>>,
    /// Legacy pointer to the statement backing the answer.
    pub query_result: Option<LegacyQueryResult>,
    pub error: Option<MessageError>,
}

impl GenieMessage {
    /// The message id, whichever field the server filled in.
    pub fn resolved_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.message_id.as_deref())
    }

    pub fn attachments(&self) -> &[GenieAttachment] {
        self.attachments.as_deref().unwrap_or_default()
    }

    /// Whether the answer is backed by a SQL query.
    pub fn has_query(&self) -> bool {
        self.query_result.is_some() || self.attachments().iter().any(|a| a.query.is_some())
    }

    /// Description of the first query attachment that has a non-empty one.
    pub fn query_description(&self) -> Option<&str> {
        self.attachments()
            .iter()
            .filter_map(|a| a.query.as_ref())
            .filter_map(|q| q.description.as_deref())
            .find(|d| !d.is_empty())
    }

    /// Content of the first text attachment that has a non-empty one.
    pub fn text_attachment(&self) -> Option<&str> {
        self.attachments()
            .iter()
            .filter_map(|a| a.text.as_ref())
            .filter_map(|t| t.content.as_deref())
            .find(|c| !c.is_empty())
    }

    /// Human-readable failure reason, if the server sent one.
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.error.as_deref())
    }
}

/// One unit of a Genie answer: a SQL query descriptor or free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenieAttachment {
    pub attachment_id: Option<String>,
    pub query: Option<GenieQuery>,
    pub text: Option<TextAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenieQuery {
    pub query: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub statement_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAttachment {
    pub id: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyQueryResult {
    pub statement_id: Option<String>,
    pub row_count: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageError {
    pub error: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenieConversation {
    pub id: Option<String>,
    pub space_id: Option<String>,
    pub title: Option<String>,
}

/// Response of the start-conversation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartConversationResponse {
    pub conversation_id: Option<String>,
    pub message_id: Option<String>,
    pub conversation: Option<GenieConversation>,
    pub message: Option<GenieMessage>,
}

impl StartConversationResponse {
    pub fn resolved_conversation_id(&self) -> Option<&str> {
        self.conversation_id
            .as_deref()
            .or_else(|| self.conversation.as_ref().and_then(|c| c.id.as_deref()))
            .or_else(|| {
                self.message
                    .as_ref()
                    .and_then(|m| m.conversation_id.as_deref())
            })
    }

    pub fn resolved_message_id(&self) -> Option<&str> {
        self.message_id
            .as_deref()
            .or_else(|| self.message.as_ref().and_then(GenieMessage::resolved_id))
    }
}

/// Response of the message query-result endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResultResponse {
    pub statement_response: Option<StatementResponse>,
}

/// A SQL statement execution result (inline or from the statements API).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementResponse {
    pub statement_id: Option<String>,
    pub status: Option<StatementStatus>,
    pub manifest: Option<ResultManifest>,
    pub result: Option<ResultData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementStatus {
    pub state: Option<String>,
    pub error: Option<StatementError>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementError {
    pub error_code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultManifest {
    pub format: Option<String>,
    pub schema: Option<ResultSchema>,
    pub total_row_count: Option<u64>,
}

/// Column schema of a result set.
///
/// `columns` is absent when the server sends an unexpected schema shape;
/// the formatter reports that instead of rendering a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnInfo>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Result rows in `JSON_ARRAY` disposition. Cells are JSON values; the
/// statements API sends them as strings or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultData {
    pub chunk_index: Option<u64>,
    pub row_offset: Option<u64>,
    pub row_count: Option<u64>,
    pub data_array: Option<Vec<Vec<serde_json::Value>>>,
}
