//! Composition root: wires stores, pusher, gate and use cases into `AppState`.

use std::sync::Arc;

use kairo_shared::time::{Clock, SystemClock};

use crate::{
    config::RelayConfig,
    domain::AccessGate,
    infrastructure::{
        access_gate::{JwtAccessGate, OpenAccessGate},
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryConnectionRepository, InMemoryMessageRepository, InMemorySessionRepository,
        },
    },
    ui::state::AppState,
    usecase::{
        BroadcastEngine, ConnectParticipantUseCase, ConnectionReaper, DisconnectParticipantUseCase,
        HistoryQueryUseCase, RejectUnroutableUseCase, SendMessageUseCase, SenderReply,
    },
};

/// Build the application state with the system clock
pub fn build_state(config: &RelayConfig) -> Arc<AppState> {
    build_state_with_clock(config, Arc::new(SystemClock))
}

/// Initialize dependencies in order:
/// 1. Repositories
/// 2. MessagePusher and AccessGate
/// 3. BroadcastEngine and ConnectionReaper
/// 4. UseCases
pub fn build_state_with_clock(config: &RelayConfig, clock: Arc<dyn Clock>) -> Arc<AppState> {
    // 1. Repositories (in-memory)
    let connections = Arc::new(InMemoryConnectionRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());
    let messages = Arc::new(InMemoryMessageRepository::new());

    // 2. MessagePusher and AccessGate
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let gate: Arc<dyn AccessGate> = match config.jwt_secret() {
        Some(secret) => Arc::new(JwtAccessGate::new(secret.as_bytes())),
        None => {
            tracing::warn!("No JWT secret configured: every connection is admitted anonymously");
            Arc::new(OpenAccessGate)
        }
    };

    // 3. Broadcast engine and reaper
    let engine = Arc::new(BroadcastEngine::new(
        connections.clone(),
        messages.clone(),
        message_pusher.clone(),
        clock,
        config.broadcast,
    ));
    let reaper = Arc::new(ConnectionReaper::new(
        connections.clone(),
        message_pusher.clone(),
        config.reap_policy,
    ));
    tracing::info!(
        "Fan-out concurrency {}, delivery timeout {:?}, reap policy {}",
        config.broadcast.fanout_concurrency,
        config.broadcast.delivery_timeout,
        config.reap_policy
    );

    // 4. UseCases
    let connect_participant_usecase = Arc::new(ConnectParticipantUseCase::new(
        gate,
        connections.clone(),
        sessions.clone(),
        message_pusher.clone(),
        engine.clone(),
        reaper.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        connections.clone(),
        sessions.clone(),
        message_pusher.clone(),
        engine.clone(),
        reaper.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        engine,
        reaper,
        config.echo_to_sender,
    ));
    let sender_reply = Arc::new(SenderReply::new(
        message_pusher.clone(),
        config.broadcast.delivery_timeout,
    ));
    let reject_unroutable_usecase = Arc::new(RejectUnroutableUseCase::new(sender_reply.clone()));
    let history_query_usecase = Arc::new(HistoryQueryUseCase::new(connections, sessions, messages));

    Arc::new(AppState {
        connect_participant_usecase,
        disconnect_participant_usecase,
        send_message_usecase,
        reject_unroutable_usecase,
        history_query_usecase,
        sender_reply,
        outbound_buffer: config.outbound_buffer,
    })
}
