//! UseCase: 参加者接続処理
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - アクセスゲート → 配信チャネル登録 → レジストリ登録 → 台帳書き込み → 入室通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：許可された接続の登録と、既存参加者への入室通知
//! - 異常系：ゲートによる拒否、レジストリ書き込み失敗、台帳書き込み失敗
//! - エッジケース：入室通知の配信失敗（接続は受け入れる）

use std::sync::Arc;

use crate::domain::{
    AccessGate, ConnectionId, ConnectionRepository, ConnectionState, MessagePusher, PrincipalId,
    PusherChannel, SessionRecord, SessionRepository, Timestamp,
};

use super::{
    broadcast::BroadcastEngine,
    error::{ConnectError, ErrorList},
    payload::joined_notice,
    reap::ConnectionReaper,
};

/// 接続要求
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    /// 生の資格情報（`Bearer ` 付きでもよい）
    pub credential: Option<String>,
    pub connection_id: ConnectionId,
    pub source_address: String,
}

/// 接続結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOutcome {
    pub connection_id: ConnectionId,
    pub principal_id: PrincipalId,
    pub connected_at: Timestamp,
    pub state: ConnectionState,
    /// 入室通知の配信件数
    pub notified: usize,
    pub reaped: Vec<ConnectionId>,
    pub errors: ErrorList,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    gate: Arc<dyn AccessGate>,
    connections: Arc<dyn ConnectionRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    engine: Arc<BroadcastEngine>,
    reaper: Arc<ConnectionReaper>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        gate: Arc<dyn AccessGate>,
        connections: Arc<dyn ConnectionRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        engine: Arc<BroadcastEngine>,
        reaper: Arc<ConnectionReaper>,
    ) -> Self {
        Self {
            gate,
            connections,
            sessions,
            message_pusher,
            engine,
            reaper,
        }
    }

    /// 資格情報だけを検証する（アップグレード前の拒否判定用）
    pub fn authorize(&self, credential: Option<&str>) -> Result<PrincipalId, ConnectError> {
        self.gate
            .authorize(credential)
            .map_err(|_| ConnectError::Unauthorized)
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `request` - 接続 ID・送信元アドレス・資格情報
    /// * `sender` - 接続への送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ConnectOutcome)` - 接続を受け入れた（通知や台帳の失敗は `errors` に入る）
    /// * `Err(ConnectError)` - 拒否、またはレジストリに登録できなかった
    pub async fn execute(
        &self,
        request: ConnectRequest,
        sender: PusherChannel,
    ) -> Result<ConnectOutcome, ConnectError> {
        let ConnectRequest {
            credential,
            connection_id,
            source_address,
        } = request;
        let state = ConnectionState::Pending;

        // 1. アクセスゲート（拒否時は何も書き込まない）
        let principal_id = match self.authorize(credential.as_deref()) {
            Ok(principal_id) => principal_id,
            Err(e) => {
                tracing::info!("connection '{}' denied", connection_id);
                return Err(e);
            }
        };

        // 2. 配信チャネルに登録してからレジストリに登録する
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        if let Err(e) = self.connections.admit(&connection_id).await {
            self.message_pusher.unregister_client(&connection_id).await;
            tracing::error!("failed to admit '{}': {}", connection_id, e);
            return Err(ConnectError::StoreUnavailable(e.to_string()));
        }
        let state = state
            .transition(ConnectionState::Active)
            .map_err(|e| ConnectError::StoreUnavailable(e.to_string()))?;

        let mut errors = ErrorList::new();
        let connected_at = self.engine.now();

        // 3. セッション台帳
        let record = SessionRecord::opened(
            connection_id.clone(),
            source_address,
            Some(principal_id.clone()),
            connected_at,
        );
        errors.record("failed to record session", self.sessions.put(record).await);

        // 4. 入室通知（失敗しても接続は受け入れる）
        let mut notified = 0;
        let mut reaped = Vec::new();
        let notice = self
            .engine
            .announce(&joined_notice(&connection_id), &connection_id)
            .await;
        if let Some(mut outcome) = errors.record("failed to announce join", notice) {
            let report = self.reaper.reap(&outcome).await;
            notified = outcome.delivered();
            errors.extend(std::mem::take(&mut outcome.errors));
            errors.extend(report.errors);
            reaped = report.reaped;
        }

        tracing::info!(
            "connection '{}' admitted for '{}' ({} notified)",
            connection_id,
            principal_id,
            notified
        );

        Ok(ConnectOutcome {
            connection_id,
            principal_id,
            connected_at,
            state,
            notified,
            reaped,
            errors,
        })
    }
}
