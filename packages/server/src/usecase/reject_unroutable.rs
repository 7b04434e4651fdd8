//! UseCase: 認識できないルートへの返信
//!
//! 送信者本人に不正リクエスト通知を 1 回だけ送ります。永続化もブロードキャストもしません。
//! 返信に失敗してもログに残すだけです。

use std::sync::Arc;

use crate::domain::ConnectionId;

use super::{payload::invalid_request_payload, reply::SenderReply};

pub struct RejectUnroutableUseCase {
    reply: Arc<SenderReply>,
}

impl RejectUnroutableUseCase {
    pub fn new(reply: Arc<SenderReply>) -> Self {
        Self { reply }
    }

    /// 返信を試み、届いたかどうかを返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> bool {
        tracing::debug!("unroutable frame from '{}'", connection_id);
        self.reply
            .send(connection_id, &invalid_request_payload())
            .await
            .is_ok()
    }
}
