//! Conversation tracking: which Genie conversation each user is in.

pub mod store;
