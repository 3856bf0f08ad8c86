//! The per-turn answer union handed from the Genie client to the formatter.

use serde::{Deserialize, Serialize};

use crate::genie::{ResultSchema, StatementResponse};

/// What Genie answered for one question. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Answer {
    /// A SQL result set.
    Table(TableAnswer),
    /// Plain message text.
    Message { text: String },
    /// A text attachment returned instead of a query result.
    Clarification { text: String },
    /// A user-visible error string.
    Error { text: String },
}

impl Answer {
    pub fn message(text: impl Into<String>) -> Self {
        Answer::Message { text: text.into() }
    }

    pub fn clarification(text: impl Into<String>) -> Self {
        Answer::Clarification { text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Answer::Error { text: text.into() }
    }
}

/// Tabular answer: column schema plus row array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableAnswer {
    pub query_description: Option<String>,
    pub schema: ResultSchema,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl TableAnswer {
    /// Build a table from a statement response. Returns `None` when the
    /// statement carries no manifest (nothing to describe the columns with).
    pub fn from_statement(
        statement: StatementResponse,
        query_description: Option<String>,
    ) -> Option<Self> {
        let schema = statement.manifest?.schema.unwrap_or_default();
        let rows = statement
            .result
            .and_then(|r| r.data_array)
            .unwrap_or_default();

        Some(Self {
            query_description,
            schema,
            rows,
        })
    }
}

/// A successful turn: the answer and the conversation it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct GenieReply {
    pub answer: Answer,
    pub conversation_id: String,
}
