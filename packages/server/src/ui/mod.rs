//! WebSocket relay server: axum router, handlers and graceful shutdown.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
