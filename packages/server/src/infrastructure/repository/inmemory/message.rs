//! InMemory メッセージログ（追記のみ）

use std::collections::{HashMap, hash_map::Entry};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{MessageId, MessageRecord, MessageRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryMessageRepository {
    records: Mutex<HashMap<MessageId, MessageRecord>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn append(&self, record: MessageRecord) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        match records.entry(record.id) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(record.id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn list(&self) -> Result<Vec<MessageRecord>, RepositoryError> {
        let records = self.records.lock().await;
        let mut list: Vec<MessageRecord> = records.values().cloned().collect();
        list.sort_by_key(|record| record.sent_at);
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, MessageContent, Timestamp};
    use chrono::Utc;

    fn record(id: MessageId, text: &str) -> MessageRecord {
        MessageRecord::new(
            id,
            ConnectionId::new("a".to_string()).unwrap(),
            MessageContent::new(text.to_string()).unwrap(),
            Timestamp::new(Utc::now()),
        )
    }

    #[tokio::test]
    async fn test_append_rejects_duplicate_id() {
        // テスト項目: 同じメッセージ ID の追記は Conflict になり、最初のレコードが残る
        // given (前提条件):
        let repository = InMemoryMessageRepository::new();
        let id = MessageId::generate();
        repository.append(record(id, "first")).await.unwrap();

        // when (操作):
        let result = repository.append(record(id, "second")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
        let list = repository.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].content.as_str(), "first");
    }
}
