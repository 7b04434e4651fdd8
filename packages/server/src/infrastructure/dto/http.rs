//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /api/connections`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionListDto {
    pub count: usize,
    pub connections: Vec<String>,
}

/// `GET /api/sessions/{connection_id}`
///
/// Timestamps use the wire format (`2024-01-01T00:05:30Z`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecordDto {
    pub connection_id: String,
    pub source_address: Option<String>,
    pub principal_id: Option<String>,
    pub connected_at: Option<String>,
    pub disconnected_at: Option<String>,
    pub duration_secs: Option<i64>,
}

/// One entry of `GET /api/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecordDto {
    pub message_id: String,
    pub sender: String,
    pub sent_at: String,
    pub message: String,
}
