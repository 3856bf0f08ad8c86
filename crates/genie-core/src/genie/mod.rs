//! Genie API port, poll loop and the ask flow built on them.

pub mod api;
pub mod poll;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
