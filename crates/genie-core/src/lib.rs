//! Business logic and port traits for the Genie bot.
//!
//! This crate defines the "ports" (`GenieApi`, `ConversationStore`) that the
//! infrastructure layer implements, plus the logic that sits between them:
//! the ask flow, the poll loop, the markdown formatter and the turn handler.
//! It depends only on `genie-types` -- never on `genie-infra` or any HTTP crate.

pub mod bot;
pub mod conversation;
pub mod format;
pub mod genie;
