//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信チャンネル（`PusherChannel`）を管理
//! - 1 接続へのペイロード送信（`push_to`）
//!
//! WebSocket の受け付けと送信タスクの起動は UI 層（`ui/handler/websocket.rs`）で行い、
//! この実装は生成されたチャンネルを受け取って送信に使うだけです。
//!
//! チャンネルは容量付きです。送信タスクが詰まっていると `send` が待ち続けるため、
//! 上限時間はブロードキャストエンジン側のタイムアウトで決まります。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
#[derive(Default)]
pub struct WebSocketMessagePusher {
    /// Key: 接続 ID / Value: 送信タスクへのチャンネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登録中の接続数
    pub async fn len(&self) -> usize {
        self.clients.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("connection '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!("connection '{}' unregistered from MessagePusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        // 送信待ちの間ロックを保持しないよう、チャンネルを複製してから解放する
        let sender = {
            let clients = self.clients.lock().await;
            clients.get(connection_id).cloned()
        };

        let Some(sender) = sender else {
            return Err(MessagePushError::ConnectionGone(connection_id.to_string()));
        };

        sender
            .send(content.to_string())
            .await
            .map_err(|_| MessagePushError::ConnectionGone(connection_id.to_string()))?;
        tracing::debug!("pushed payload to '{}'", connection_id);
        Ok(())
    }
}
