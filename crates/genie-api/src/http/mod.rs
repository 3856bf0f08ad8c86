//! HTTP layer: the Bot Framework messaging endpoint and a health check.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
