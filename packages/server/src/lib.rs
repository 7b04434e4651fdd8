//! Kairo WebSocket chat relay.
//!
//! Tracks the set of open connections, fans chat messages out to all of them
//! with per-recipient failure tolerance, and keeps a session ledger and a
//! message log.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// composition root
pub mod app;
pub mod config;
