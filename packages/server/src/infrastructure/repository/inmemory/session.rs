//! InMemory セッション台帳

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, RepositoryError, SessionDuration, SessionRecord, SessionRepository, Timestamp,
};

#[derive(Default)]
pub struct InMemorySessionRepository {
    records: Mutex<HashMap<ConnectionId, SessionRecord>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn put(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        records.insert(record.connection_id.clone(), record);
        Ok(())
    }

    async fn get(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<SessionRecord>, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records.get(connection_id).cloned())
    }

    async fn record_disconnect(
        &self,
        connection_id: &ConnectionId,
        disconnected_at: Timestamp,
        duration: Option<SessionDuration>,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        records
            .entry(connection_id.clone())
            .or_insert_with(|| SessionRecord::detached(connection_id.clone()))
            .close(disconnected_at, duration);
        Ok(())
    }
}
