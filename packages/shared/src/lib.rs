//! Shared utilities for the Kairo chat relay (logging setup and clock abstraction).

pub mod logger;
pub mod time;
