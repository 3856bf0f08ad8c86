//! Observability setup for the Genie bot: structured logging through
//! `tracing-subscriber` with an optional OpenTelemetry bridge.

pub mod tracing_setup;

pub use tracing_setup::{LogOptions, init_tracing, shutdown_tracing};
