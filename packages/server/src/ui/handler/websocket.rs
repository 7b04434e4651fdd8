//! WebSocket connection handlers.
//!
//! Every socket event is turned into one use case invocation:
//! upgrade request → connect, text frame → send message or unroutable,
//! socket end → disconnect.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{InboundRoute, RouteResponse, resolve_route},
    ui::state::AppState,
    usecase::{
        BroadcastError, ConnectError, ConnectRequest, DisconnectOutcome, SendMessageOutcome,
        payload::pong_payload,
    },
};

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    /// Fallback credential for clients that cannot set headers
    pub token: Option<String>,
}

fn credential_from(headers: &HeaderMap, query: ConnectQuery) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .or(query.token)
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Query(query): Query<ConnectQuery>,
) -> Response {
    let connection_id = ConnectionId::generate();
    let request = ConnectRequest {
        credential: credential_from(&headers, query),
        connection_id: connection_id.clone(),
        source_address: peer.ip().to_string(),
    };

    // Channel for payloads pushed to this connection
    let (tx, rx) = mpsc::channel(state.outbound_buffer.max(1));

    match state.connect_participant_usecase.execute(request, tx).await {
        Ok(outcome) => {
            if !outcome.errors.is_empty() {
                tracing::warn!(
                    "Connection '{}' admitted with {} error(s)",
                    connection_id,
                    outcome.errors.len()
                );
            }

            let admitted = AdmittedConnection::new(state, connection_id.clone());
            ws.on_failed_upgrade(move |e| {
                tracing::warn!("WebSocket upgrade for '{}' failed: {}", connection_id, e);
            })
            .on_upgrade(move |socket| handle_socket(socket, admitted, rx))
        }
        Err(ConnectError::Unauthorized) => {
            tracing::warn!("Rejected connection from {}: unauthorized", peer);
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(ConnectError::StoreUnavailable(e)) => {
            tracing::error!("Rejected connection from {}: {}", peer, e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

/// Spawns a task that forwards pushed payloads to the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    admitted: AdmittedConnection,
    rx: mpsc::Receiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let state_clone = admitted.state.clone();
    let id_clone = admitted.connection_id.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => dispatch(&state_clone, &id_clone, text.as_str()).await,
                Message::Binary(_) => {
                    state_clone
                        .reject_unroutable_usecase
                        .execute(&id_clone)
                        .await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", id_clone);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let outcome = admitted.finish().await;
    tracing::info!(
        "Connection '{}': {} ({} error(s))",
        outcome.connection_id,
        outcome.status(),
        outcome.errors.len()
    );
}

/// A connection admitted to the registry whose disconnect has not run yet.
///
/// Dropped without `finish` (the upgrade failed or was abandoned), it runs the
/// disconnect use case in the background so the registry entry is removed and
/// the session record is closed.
struct AdmittedConnection {
    state: Arc<AppState>,
    connection_id: ConnectionId,
    finished: bool,
}

impl AdmittedConnection {
    fn new(state: Arc<AppState>, connection_id: ConnectionId) -> Self {
        Self {
            state,
            connection_id,
            finished: false,
        }
    }

    async fn finish(mut self) -> DisconnectOutcome {
        self.finished = true;
        self.state
            .disconnect_participant_usecase
            .execute(self.connection_id.clone())
            .await
    }
}

impl Drop for AdmittedConnection {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::error!(
                "Connection '{}' abandoned outside the runtime; session left open",
                self.connection_id
            );
            return;
        };

        tracing::warn!(
            "Connection '{}' abandoned before the socket opened",
            self.connection_id
        );
        let state = self.state.clone();
        let connection_id = self.connection_id.clone();
        runtime.spawn(async move {
            let outcome = state
                .disconnect_participant_usecase
                .execute(connection_id)
                .await;
            tracing::info!(
                "Connection '{}': {} ({} error(s))",
                outcome.connection_id,
                outcome.status(),
                outcome.errors.len()
            );
        });
    }
}

/// Route one text frame and reply to the sender where the route calls for it.
async fn dispatch(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let message = match resolve_route(text) {
        InboundRoute::SendMessage(message) => message,
        InboundRoute::Unroutable => {
            tracing::debug!("Unroutable frame from '{}'", connection_id);
            state.reject_unroutable_usecase.execute(connection_id).await;
            return;
        }
    };

    let reply = match state
        .send_message_usecase
        .execute(connection_id, &message)
        .await
    {
        Ok(SendMessageOutcome::Pong) => Some(pong_payload()),
        Ok(result) => {
            if let SendMessageOutcome::Relayed { outcome, reaped } = &result {
                tracing::info!(
                    "{} (from '{}', {}/{} delivered, {} reaped, {} error(s))",
                    result.status(),
                    connection_id,
                    outcome.delivered(),
                    outcome.attempted(),
                    reaped.len(),
                    outcome.errors.len()
                );
            }
            None
        }
        Err(e @ BroadcastError::EmptyMessage) => {
            Some(RouteResponse::bad_request(&e.to_string()).to_json())
        }
        Err(BroadcastError::RegistryUnavailable(e)) => {
            tracing::error!("Broadcast from '{}' aborted: {}", connection_id, e);
            Some(RouteResponse::server_error(vec![e]).to_json())
        }
    };

    if let Some(reply) = reply {
        // Failures are logged by the reply channel
        let _ = state.sender_reply.send(connection_id, &reply).await;
    }
}
