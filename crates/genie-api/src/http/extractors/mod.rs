//! Request extractors.

pub mod auth;
pub mod content_type;
