//! 送信者本人への直接返信
//!
//! `pong`、400 / 500 の返信、不正リクエスト通知は送信者の送信チャンネルに 1 回だけ送ります。
//! ブロードキャストと同じ配信タイムアウトを適用し、読まないクライアントで受信処理が止まらないようにします。

use std::{sync::Arc, time::Duration};

use crate::domain::{ConnectionId, MessagePushError, MessagePusher};

/// タイムアウト付きで 1 接続へ送信。期限切れは `MessagePushError::Timeout`。
pub async fn push_with_timeout(
    message_pusher: &dyn MessagePusher,
    connection_id: &ConnectionId,
    payload: &str,
    timeout: Duration,
) -> Result<(), MessagePushError> {
    match tokio::time::timeout(timeout, message_pusher.push_to(connection_id, payload)).await {
        Ok(result) => result,
        Err(_) => Err(MessagePushError::Timeout(connection_id.to_string())),
    }
}

/// 送信者への直接返信
pub struct SenderReply {
    message_pusher: Arc<dyn MessagePusher>,
    timeout: Duration,
}

impl SenderReply {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, timeout: Duration) -> Self {
        Self {
            message_pusher,
            timeout,
        }
    }

    /// 返信を送る。失敗は `warn` ログに残して返す（呼び出し側は無視してよい）。
    pub async fn send(
        &self,
        connection_id: &ConnectionId,
        payload: &str,
    ) -> Result<(), MessagePushError> {
        let result =
            push_with_timeout(self.message_pusher.as_ref(), connection_id, payload, self.timeout)
                .await;
        if let Err(e) = &result {
            tracing::warn!("failed to reply to '{}': {}", connection_id, e);
        }
        result
    }
}
