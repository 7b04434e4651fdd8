//! Conversion logic between DTOs and domain entities.

use crate::domain::{ConnectionId, MessageRecord, SessionRecord};
use crate::infrastructure::dto::http as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<SessionRecord> for dto::SessionRecordDto {
    fn from(model: SessionRecord) -> Self {
        Self {
            connection_id: model.connection_id.into_string(),
            source_address: model.source_address,
            principal_id: model.principal_id.map(|p| p.as_str().to_string()),
            connected_at: model.connected_at.map(|t| t.to_wire_string()),
            disconnected_at: model.disconnected_at.map(|t| t.to_wire_string()),
            duration_secs: model.duration.map(|d| d.as_secs()),
        }
    }
}

impl From<MessageRecord> for dto::MessageRecordDto {
    fn from(model: MessageRecord) -> Self {
        Self {
            message_id: model.id.to_string(),
            sender: model.sender.into_string(),
            sent_at: model.sent_at.to_wire_string(),
            message: model.content.into_string(),
        }
    }
}

impl From<Vec<ConnectionId>> for dto::ConnectionListDto {
    fn from(ids: Vec<ConnectionId>) -> Self {
        Self {
            count: ids.len(),
            connections: ids.into_iter().map(ConnectionId::into_string).collect(),
        }
    }
}
