//! Shared domain types for the Genie bot.
//!
//! This crate contains the types used across the workspace: Genie REST wire
//! shapes, the per-turn answer union, Bot Framework activities, and the error
//! enums the other crates return.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod activity;
pub mod answer;
pub mod error;
pub mod genie;
