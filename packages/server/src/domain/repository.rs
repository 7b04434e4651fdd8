//! Repository trait 定義
//!
//! ドメイン層が必要とするデータストアのインターフェースを定義します。
//! 各操作はキー単位でアトミックであることだけを前提とし、複数キーにまたがる
//! トランザクションは要求しません。

use async_trait::async_trait;

use super::{
    ConnectionId, MessageRecord, RepositoryError, SessionDuration, SessionRecord, Timestamp,
};

/// 接続レジストリ
///
/// 現在開いている接続 ID の集合。ブロードキャスト対象を決める唯一の情報源です。
/// 次の配信失敗まで死んだ接続を含むことはあっても、重複は含みません。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 接続 ID を追加（冪等）
    async fn admit(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError>;

    /// 接続 ID を削除（冪等。存在しなくてもエラーにしない）
    async fn remove(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError>;

    /// 呼び出し時点の全接続 ID
    async fn list_all(&self) -> Result<Vec<ConnectionId>, RepositoryError>;

    /// 接続数
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// セッション台帳
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 接続時のレコードを書き込む
    async fn put(&self, record: SessionRecord) -> Result<(), RepositoryError>;

    /// 接続 ID でレコードを取得
    async fn get(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<SessionRecord>, RepositoryError>;

    /// 切断時刻と継続時間を書き込む
    ///
    /// レコードが存在しない場合は切断情報だけを持つレコードを作成します。
    async fn record_disconnect(
        &self,
        connection_id: &ConnectionId,
        disconnected_at: Timestamp,
        duration: Option<SessionDuration>,
    ) -> Result<(), RepositoryError>;
}

/// メッセージログ（追記のみ）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを追記。同じ ID が既にあれば `RepositoryError::Conflict`。
    async fn append(&self, record: MessageRecord) -> Result<(), RepositoryError>;

    /// 送信時刻順の全メッセージ
    async fn list(&self) -> Result<Vec<MessageRecord>, RepositoryError>;
}
