//! Infrastructure layer for the Genie bot.
//!
//! Contains implementations of the ports defined in `genie-core`: the
//! reqwest-backed Genie REST client and the in-memory conversation store.
//! Also hosts the Bot Framework connector client and the settings loader.

pub mod botframework;
pub mod config;
pub mod conversation;
pub mod genie;
