//! Databricks Genie REST client.

pub mod client;

pub use client::DatabricksGenieClient;
