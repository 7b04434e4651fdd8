//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    domain::ConnectionId,
    infrastructure::dto::http::{ConnectionListDto, MessageRecordDto, SessionRecordDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Currently registered connection ids
pub async fn list_connections(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConnectionListDto>, StatusCode> {
    match state.history_query_usecase.connections().await {
        Ok(ids) => Ok(Json(ids.into())),
        Err(e) => {
            tracing::error!("Failed to list connections: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Session ledger record of one connection
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(connection_id): Path<String>,
) -> Result<Json<SessionRecordDto>, StatusCode> {
    let connection_id = ConnectionId::new(connection_id).map_err(|_| StatusCode::BAD_REQUEST)?;

    match state.history_query_usecase.session(&connection_id).await {
        Ok(Some(record)) => Ok(Json(record.into())),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to read session '{}': {}", connection_id, e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

/// Message log ordered by send time
pub async fn get_message_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageRecordDto>>, StatusCode> {
    match state.history_query_usecase.messages().await {
        Ok(records) => Ok(Json(records.into_iter().map(Into::into).collect())),
        Err(e) => {
            tracing::error!("Failed to read message history: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
