//! UseCase テスト用のヘルパー

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use kairo_shared::time::FixedClock;

use crate::{
    domain::{
        AccessError, AccessGate, ConnectionId, ConnectionRepository, MessagePushError,
        MessagePusher, PrincipalId, PusherChannel,
    },
    infrastructure::repository::{
        InMemoryConnectionRepository, InMemoryMessageRepository, InMemorySessionRepository,
    },
};

use super::broadcast::{BroadcastEngine, BroadcastSettings};

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub fn fixed_clock(wire: &str) -> Arc<FixedClock> {
    Arc::new(FixedClock::at(wire).unwrap())
}

pub fn test_settings() -> BroadcastSettings {
    BroadcastSettings {
        fanout_concurrency: 4,
        delivery_timeout: Duration::from_millis(100),
    }
}

/// テスト用のストア一式
pub struct Stores {
    pub connections: Arc<InMemoryConnectionRepository>,
    pub sessions: Arc<InMemorySessionRepository>,
    pub messages: Arc<InMemoryMessageRepository>,
}

impl Stores {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(InMemoryConnectionRepository::new()),
            sessions: Arc::new(InMemorySessionRepository::new()),
            messages: Arc::new(InMemoryMessageRepository::new()),
        }
    }

    /// 指定した接続 ID をレジストリに登録済みにする
    pub async fn with_connections(ids: &[&str]) -> Self {
        let stores = Self::new();
        for id in ids {
            stores.connections.admit(&conn(id)).await.unwrap();
        }
        stores
    }

    pub fn engine(&self, pusher: Arc<RecordingPusher>, wire_now: &str) -> Arc<BroadcastEngine> {
        Arc::new(BroadcastEngine::new(
            self.connections.clone(),
            self.messages.clone(),
            pusher,
            fixed_clock(wire_now),
            test_settings(),
        ))
    }
}

/// 送信内容を記録する MessagePusher
///
/// 接続ごとに失敗・無応答を仕込めます。
#[derive(Default)]
pub struct RecordingPusher {
    failures: HashMap<ConnectionId, MessagePushError>,
    hanging: HashSet<ConnectionId>,
    attempts: Mutex<Vec<ConnectionId>>,
    delivered: Mutex<Vec<(ConnectionId, String)>>,
    registered: Mutex<HashSet<ConnectionId>>,
}

impl RecordingPusher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, id: &str, error: MessagePushError) -> Self {
        self.failures.insert(conn(id), error);
        self
    }

    pub fn gone(self, id: &str) -> Self {
        self.failing(id, MessagePushError::ConnectionGone(id.to_string()))
    }

    pub fn hanging(mut self, id: &str) -> Self {
        self.hanging.insert(conn(id));
        self
    }

    pub fn attempts(&self) -> Vec<ConnectionId> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn delivered_to(&self) -> HashSet<ConnectionId> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn payloads_for(&self, id: &str) -> Vec<String> {
        let target = conn(id);
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == target)
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registered.lock().unwrap().contains(&conn(id))
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, connection_id: ConnectionId, _sender: PusherChannel) {
        self.registered.lock().unwrap().insert(connection_id);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        self.registered.lock().unwrap().remove(connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        self.attempts.lock().unwrap().push(connection_id.clone());

        if self.hanging.contains(connection_id) {
            std::future::pending::<()>().await;
        }
        if let Some(error) = self.failures.get(connection_id) {
            return Err(error.clone());
        }

        self.delivered
            .lock()
            .unwrap()
            .push((connection_id.clone(), content.to_string()));
        Ok(())
    }
}

/// 常に固定の判定を返すアクセスゲート
pub struct StaticGate(pub Option<&'static str>);

impl AccessGate for StaticGate {
    fn authorize(&self, _credential: Option<&str>) -> Result<PrincipalId, AccessError> {
        match self.0 {
            Some(principal) => Ok(PrincipalId::new(principal.to_string()).unwrap()),
            None => Err(AccessError::Unauthorized),
        }
    }
}
