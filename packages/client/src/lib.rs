//! Kairo CLI chat client.

pub mod domain;
pub mod error;
mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
pub use session::SessionOptions;
