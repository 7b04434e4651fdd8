//! HTTP and WebSocket handlers.

mod http;
mod websocket;

pub use http::{get_message_history, get_session, health_check, list_connections};
pub use websocket::websocket_handler;
