//! ドメイン層のエラー定義

use thiserror::Error;

use super::entity::ConnectionState;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("connection id is too long ({0} bytes, max 128)")]
    ConnectionIdTooLong(usize),

    #[error("message cannot be empty")]
    MessageEmpty,

    #[error("principal id must not be empty")]
    PrincipalIdEmpty,
}

/// ストア（レジストリ・台帳・ログ）操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// バックエンドストアに読み書きできない
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// 追記専用ストアで同じキーが既に存在する
    #[error("key already exists: {0}")]
    Conflict(String),
}

/// 1 接続への配信エラー
///
/// `ConnectionGone` は受信者がもう存在しないことを示し、レジストリからの回収対象になります。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is gone")]
    ConnectionGone(String),

    #[error("push to '{connection_id}' failed: {reason}")]
    PushFailed {
        connection_id: String,
        reason: String,
    },

    #[error("push to '{0}' timed out")]
    Timeout(String),
}

impl MessagePushError {
    /// 受信者が消えたことによる失敗かどうか
    pub fn is_gone(&self) -> bool {
        matches!(self, Self::ConnectionGone(_))
    }
}

/// アクセスゲートの拒否
///
/// 資格情報の欠落・形式不正・期限切れ・署名不一致はすべて同じ `Unauthorized` になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("unauthorized")]
    Unauthorized,
}

/// 接続状態の不正な遷移
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid connection state transition: {from:?} -> {to:?}")]
pub struct StateTransitionError {
    pub from: ConnectionState,
    pub to: ConnectionState,
}
