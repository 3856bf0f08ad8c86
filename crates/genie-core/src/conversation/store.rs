//! Conversation store trait.
//!
//! Maps an end-user id to the last Genie conversation id seen for them.
//! Implementations live in genie-infra.

use genie_types::error::StoreError;

/// Trait for the user -> conversation id mapping.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition) so an external
/// cache can back it as easily as an in-memory map. There is no eviction:
/// an entry lives until it is overwritten.
pub trait ConversationStore: Send + Sync {
    /// Get the conversation id for a user. Returns None for a user never seen.
    fn get(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Set (or overwrite) the conversation id for a user.
    fn set(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
