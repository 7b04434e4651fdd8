//! InMemory 接続レジストリ

use std::collections::BTreeSet;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRepository, RepositoryError};

/// インメモリ接続レジストリ
///
/// 集合として保持するため重複は構造上発生しません。
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    connections: Mutex<BTreeSet<ConnectionId>>,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn admit(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        if !connections.insert(connection_id.clone()) {
            tracing::debug!("connection '{}' already admitted", connection_id);
        }
        Ok(())
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ConnectionId>, RepositoryError> {
        let connections = self.connections.lock().await;
        Ok(connections.iter().cloned().collect())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let connections = self.connections.lock().await;
        Ok(connections.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_admit_is_idempotent() {
        // テスト項目: 同じ ID を 2 回登録しても 1 件のまま
        // given (前提条件):
        let repository = InMemoryConnectionRepository::new();

        // when (操作):
        repository.admit(&conn("a")).await.unwrap();
        repository.admit(&conn("a")).await.unwrap();

        // then (期待する結果):
        assert_eq!(repository.list_all().await.unwrap(), vec![conn("a")]);
    }

    #[tokio::test]
    async fn test_remove_absent_is_ok() {
        // テスト項目: 存在しない ID の削除はエラーにならない
        // given (前提条件):
        let repository = InMemoryConnectionRepository::new();
        repository.admit(&conn("a")).await.unwrap();

        // when (操作):
        let result = repository.remove(&conn("missing")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(repository.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_admit_and_remove() {
        // テスト項目: 異なる ID の並行登録・削除で集合が壊れない
        // given (前提条件):
        let repository = Arc::new(InMemoryConnectionRepository::new());
        for i in 0..50 {
            repository.admit(&conn(&format!("old-{i}"))).await.unwrap();
        }

        // when (操作):
        let mut handles = Vec::new();
        for i in 0..50 {
            let repository = repository.clone();
            handles.push(tokio::spawn(async move {
                repository.admit(&conn(&format!("new-{i}"))).await.unwrap();
                repository.remove(&conn(&format!("old-{i}"))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let ids = repository.list_all().await.unwrap();
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| id.as_str().starts_with("new-")));
    }
}
