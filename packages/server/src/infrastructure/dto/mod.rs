//! Data Transfer Objects (DTOs) for the relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: inbound frames and direct replies on the socket
//! - `http`: read-only HTTP API responses

pub mod conversion;
pub mod http;
pub mod websocket;
