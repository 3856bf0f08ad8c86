//! In-memory conversation store backed by `DashMap`.
//!
//! Lives as long as the process. There is no capacity bound and no expiry:
//! every user ever seen keeps one entry.

use std::sync::Arc;

use dashmap::DashMap;

use genie_core::conversation::store::ConversationStore;
use genie_types::error::StoreError;

/// Concurrent user id -> conversation id map.
///
/// Cloning produces a shared view of the same underlying map (backed by
/// `Arc`). Reads clone the value out so no `DashMap` guard outlives the call.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    inner: Arc<DashMap<String, String>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a tracked conversation.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.get(user_id).map(|r| r.value().clone()))
    }

    async fn set(&self, user_id: &str, conversation_id: &str) -> Result<(), StoreError> {
        self.inner
            .insert(user_id.to_string(), conversation_id.to_string());
        Ok(())
    }
}
