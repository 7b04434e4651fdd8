//! UseCase: 接続・セッション・メッセージ履歴の参照

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRepository, MessageRecord, MessageRepository, RepositoryError,
    SessionRecord, SessionRepository,
};

pub struct HistoryQueryUseCase {
    connections: Arc<dyn ConnectionRepository>,
    sessions: Arc<dyn SessionRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl HistoryQueryUseCase {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        sessions: Arc<dyn SessionRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            connections,
            sessions,
            messages,
        }
    }

    /// 接続中の ID（ソート済み）
    pub async fn connections(&self) -> Result<Vec<ConnectionId>, RepositoryError> {
        let mut ids = self.connections.list_all().await?;
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    pub async fn session(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<SessionRecord>, RepositoryError> {
        self.sessions.get(connection_id).await
    }

    /// 送信時刻順のメッセージ履歴
    pub async fn messages(&self) -> Result<Vec<MessageRecord>, RepositoryError> {
        let mut records = self.messages.list().await?;
        records.sort_by_key(|record| record.sent_at);
        Ok(records)
    }
}
