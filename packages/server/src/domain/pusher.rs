//! 配信チャネル（MessagePusher）trait 定義
//!
//! 接続 ID を指定して 1 接続へペイロードを送る抽象です。
//! 配信の失敗は接続ごとに独立しており、他の接続には影響しません。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// 接続ごとの送信用チャンネル
///
/// 容量付きのチャンネルを使い、詰まった接続は送信待ちのままタイムアウトさせます。
pub type PusherChannel = mpsc::Sender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信チャンネルを登録解除（未登録でも何もしない）
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 1 接続へ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
