//! UseCase: 参加者切断処理
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 継続時間の算出、台帳の更新、退室通知、レジストリからの削除
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続記録のある参加者の切断（継続時間あり）
//! - 異常系：台帳の読み取り失敗、退室通知の失敗（どちらも後続ステップは続行）
//! - エッジケース：接続記録がない切断（継続時間は不明のまま）、時計の巻き戻り

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, ConnectionState, MessagePusher, SessionDuration,
    SessionRepository, Timestamp,
};

use super::{broadcast::BroadcastEngine, error::ErrorList, payload::left_notice, reap::ConnectionReaper};

/// 切断結果
///
/// 切断処理自体は失敗しません。各ステップの失敗は `errors` に入ります。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    pub connection_id: ConnectionId,
    pub disconnected_at: Timestamp,
    /// 接続時刻が分からなければ `None`
    pub duration: Option<SessionDuration>,
    pub state: ConnectionState,
    pub notified: usize,
    pub reaped: Vec<ConnectionId>,
    pub errors: ErrorList,
}

impl DisconnectOutcome {
    pub fn status(&self) -> &'static str {
        if self.errors.is_empty() {
            "Disconnected successfully"
        } else {
            "Disconnected with errors"
        }
    }
}

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    connections: Arc<dyn ConnectionRepository>,
    sessions: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    engine: Arc<BroadcastEngine>,
    reaper: Arc<ConnectionReaper>,
}

impl DisconnectParticipantUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        sessions: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        engine: Arc<BroadcastEngine>,
        reaper: Arc<ConnectionReaper>,
    ) -> Self {
        Self {
            connections,
            sessions,
            message_pusher,
            engine,
            reaper,
        }
    }

    /// 参加者切断を実行
    ///
    /// どのステップが失敗しても残りのステップは必ず試みます。
    pub async fn execute(&self, connection_id: ConnectionId) -> DisconnectOutcome {
        let mut errors = ErrorList::new();
        let disconnected_at = self.engine.now();

        // 1. 継続時間（記録が無い・読めない場合は不明）
        let session = errors
            .record("failed to read session", self.sessions.get(&connection_id).await)
            .flatten();
        let duration = session
            .as_ref()
            .and_then(|record| record.duration_until(disconnected_at));
        if duration.is_some_and(|d| d.was_clamped()) {
            tracing::warn!(
                "clock skew on '{}': disconnect precedes connect, duration clamped to 0",
                connection_id
            );
        }

        // 2. 台帳を更新（記録が無ければ切断情報だけのレコードになる）
        errors.record(
            "failed to record disconnect",
            self.sessions
                .record_disconnect(&connection_id, disconnected_at, duration)
                .await,
        );

        // 3. 退室通知（削除前に列挙し、本人は除外）
        let mut notified = 0;
        let mut reaped = Vec::new();
        let notice = self
            .engine
            .announce(&left_notice(&connection_id), &connection_id)
            .await;
        if let Some(mut outcome) = errors.record("failed to announce leave", notice) {
            let report = self.reaper.reap(&outcome).await;
            notified = outcome.delivered();
            errors.extend(std::mem::take(&mut outcome.errors));
            errors.extend(report.errors);
            reaped = report.reaped;
        }

        // 4. レジストリから削除し、配信チャネルを登録解除
        errors.record(
            "failed to remove connection",
            self.connections.remove(&connection_id).await,
        );
        self.message_pusher.unregister_client(&connection_id).await;

        tracing::info!(
            "connection '{}' closed after {}",
            connection_id,
            duration.map_or_else(|| "unknown duration".to_string(), |d| format!("{}s", d.as_secs()))
        );

        DisconnectOutcome {
            connection_id,
            disconnected_at,
            duration,
            state: ConnectionState::Closed,
            notified,
            reaped,
            errors,
        }
    }
}
