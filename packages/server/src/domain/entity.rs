//! エンティティ
//!
//! - `ConnectionState`: 接続ごとのライフサイクル状態
//! - `SessionRecord`: セッション台帳の 1 行（接続 ID がキー）
//! - `MessageRecord`: メッセージログの 1 行（メッセージ ID がキー、追記のみ）

use super::{
    error::StateTransitionError,
    value_object::{
        ConnectionId, MessageContent, MessageId, PrincipalId, SessionDuration, Timestamp,
    },
};

/// 接続のライフサイクル状態
///
/// ```text
/// Pending ──(許可)──> Active ──(切断)──> Closed
///    └─────────(拒否)─────────────────> Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// 資格情報の検証中。レジストリにはまだ存在しない。
    Pending,
    /// レジストリに登録済み
    Active,
    /// 切断済み、または接続が拒否された
    Closed,
}

impl ConnectionState {
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active) | (Self::Pending, Self::Closed) | (Self::Active, Self::Closed)
        )
    }

    pub fn transition(self, next: ConnectionState) -> Result<ConnectionState, StateTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StateTransitionError {
                from: self,
                to: next,
            })
        }
    }
}

/// セッション台帳のレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub connection_id: ConnectionId,
    pub source_address: Option<String>,
    pub principal_id: Option<PrincipalId>,
    pub connected_at: Option<Timestamp>,
    pub disconnected_at: Option<Timestamp>,
    /// 接続時刻が不明な場合は `None`（0 を捏造しない）
    pub duration: Option<SessionDuration>,
}

impl SessionRecord {
    /// 接続時に作成するレコード
    pub fn opened(
        connection_id: ConnectionId,
        source_address: String,
        principal_id: Option<PrincipalId>,
        connected_at: Timestamp,
    ) -> Self {
        Self {
            connection_id,
            source_address: Some(source_address),
            principal_id,
            connected_at: Some(connected_at),
            disconnected_at: None,
            duration: None,
        }
    }

    /// 接続記録がない接続 ID に対して切断情報だけを持つレコード
    pub fn detached(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            source_address: None,
            principal_id: None,
            connected_at: None,
            disconnected_at: None,
            duration: None,
        }
    }

    /// 指定した切断時刻までの継続時間。接続時刻が無ければ `None`。
    pub fn duration_until(&self, disconnected_at: Timestamp) -> Option<SessionDuration> {
        self.connected_at
            .map(|connected_at| SessionDuration::between(connected_at, disconnected_at))
    }

    /// 切断情報を書き込む
    pub fn close(&mut self, disconnected_at: Timestamp, duration: Option<SessionDuration>) {
        self.disconnected_at = Some(disconnected_at);
        self.duration = duration;
    }

    pub fn is_closed(&self) -> bool {
        self.disconnected_at.is_some()
    }
}

/// メッセージログのレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: MessageId,
    pub sender: ConnectionId,
    pub sent_at: Timestamp,
    pub content: MessageContent,
}

impl MessageRecord {
    pub fn new(
        id: MessageId,
        sender: ConnectionId,
        content: MessageContent,
        sent_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender,
            sent_at,
            content,
        }
    }
}
