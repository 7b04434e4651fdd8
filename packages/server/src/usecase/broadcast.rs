//! UseCase: ブロードキャストエンジン
//!
//! レジストリを 1 回だけ列挙し、同じペイロードを全受信者へ独立に配信します。
//! 配信の失敗は受信者ごとに記録し、残りの配信は止めません。
//! 失敗した受信者の回収はここでは行わず、呼び出し側が `ConnectionReaper` に渡します。
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者以外の全接続へ配信、メッセージログへの追記
//! - 異常系：空メッセージ、レジストリ列挙失敗、ログ書き込み失敗、一部受信者の配信失敗
//! - エッジケース：`ping`、送信者のみ接続中、応答しない受信者（タイムアウト）

use std::{collections::BTreeSet, sync::Arc, time::Duration};

use futures_util::{StreamExt, stream};
use kairo_shared::time::Clock;

use crate::domain::{
    ConnectionId, ConnectionRepository, MessageContent, MessageId, MessagePushError,
    MessagePusher, MessageRecord, MessageRepository, Timestamp,
};

use super::{
    error::{BroadcastError, ErrorList},
    payload::{chat_payload, notice_payload},
    reply::push_with_timeout,
};

pub const DEFAULT_FANOUT_CONCURRENCY: usize = 16;
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(3);

/// 配信の並列度とタイムアウト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastSettings {
    pub fanout_concurrency: usize,
    pub delivery_timeout: Duration,
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            fanout_concurrency: DEFAULT_FANOUT_CONCURRENCY,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }
}

/// 1 受信者への配信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub recipient: ConnectionId,
    pub result: Result<(), MessagePushError>,
}

impl DeliveryReport {
    pub fn error(&self) -> Option<&MessagePushError> {
        self.result.as_ref().err()
    }
}

/// 1 回のブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOutcome {
    /// システム通知では `None`
    pub message_id: Option<MessageId>,
    /// メッセージログへの書き込みに成功したか
    pub persisted: bool,
    pub deliveries: Vec<DeliveryReport>,
    pub errors: ErrorList,
}

impl BroadcastOutcome {
    pub fn attempted(&self) -> usize {
        self.deliveries.len()
    }

    pub fn delivered(&self) -> usize {
        self.deliveries.iter().filter(|d| d.result.is_ok()).count()
    }

    /// 配信に失敗した受信者とそのエラー
    pub fn failed(&self) -> impl Iterator<Item = (&ConnectionId, &MessagePushError)> {
        self.deliveries
            .iter()
            .filter_map(|d| d.error().map(|e| (&d.recipient, e)))
    }
}

/// `broadcast` の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastReply {
    /// 制御トークン `ping` への応答。配信も永続化もしていない。
    Pong,
    Relayed(BroadcastOutcome),
}

/// ブロードキャストエンジン
pub struct BroadcastEngine {
    connections: Arc<dyn ConnectionRepository>,
    messages: Arc<dyn MessageRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    settings: BroadcastSettings,
}

impl BroadcastEngine {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        messages: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        settings: BroadcastSettings,
    ) -> Self {
        Self {
            connections,
            messages,
            message_pusher,
            clock,
            settings,
        }
    }

    pub fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_utc())
    }

    /// チャットメッセージをブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `message` - 受信した本文（前後の空白を含むそのままの文字列）
    /// * `sender` - 送信者の接続 ID
    /// * `exclude_sender` - 送信者自身を配信対象から外すか
    ///
    /// # Returns
    ///
    /// * `Ok(BroadcastReply::Pong)` - `ping` だった
    /// * `Ok(BroadcastReply::Relayed(_))` - 配信を試みた（一部失敗を含む）
    /// * `Err(BroadcastError)` - 空メッセージ、またはレジストリを列挙できない
    pub async fn broadcast(
        &self,
        message: &str,
        sender: &ConnectionId,
        exclude_sender: bool,
    ) -> Result<BroadcastReply, BroadcastError> {
        let content = MessageContent::new(message.to_string())
            .map_err(|_| BroadcastError::EmptyMessage)?;

        if content.is_ping() {
            tracing::debug!("ping from '{}'", sender);
            return Ok(BroadcastReply::Pong);
        }

        let mut outcome = BroadcastOutcome::default();
        let message_id = MessageId::generate();
        let sent_at = self.now();
        outcome.message_id = Some(message_id);

        // ログへの書き込み失敗は配信を止めない
        let record = MessageRecord::new(message_id, sender.clone(), content.clone(), sent_at);
        outcome.persisted = outcome
            .errors
            .record("failed to persist message", self.messages.append(record).await)
            .is_some();

        let payload = chat_payload(sent_at, sender, &content);
        let exclude = exclude_sender.then_some(sender);
        let recipients = self.snapshot_recipients(exclude).await?;

        outcome.deliveries = self.fan_out(recipients, &payload).await;
        collect_delivery_errors(&mut outcome);

        tracing::info!(
            "message {} from '{}' relayed to {}/{} recipients",
            message_id,
            sender,
            outcome.delivered(),
            outcome.attempted()
        );
        Ok(BroadcastReply::Relayed(outcome))
    }

    /// システム通知をブロードキャスト
    ///
    /// `subject`（入室・退室した接続）は配信対象から外します。メッセージログには残しません。
    pub async fn announce(
        &self,
        text: &str,
        subject: &ConnectionId,
    ) -> Result<BroadcastOutcome, BroadcastError> {
        let recipients = self.snapshot_recipients(Some(subject)).await?;
        let payload = notice_payload(text);

        let mut outcome = BroadcastOutcome {
            deliveries: self.fan_out(recipients, &payload).await,
            ..BroadcastOutcome::default()
        };
        collect_delivery_errors(&mut outcome);

        tracing::debug!(
            "notice about '{}' delivered to {}/{} recipients",
            subject,
            outcome.delivered(),
            outcome.attempted()
        );
        Ok(outcome)
    }

    /// レジストリのスナップショットから重複を除いた配信対象を作る
    async fn snapshot_recipients(
        &self,
        exclude: Option<&ConnectionId>,
    ) -> Result<Vec<ConnectionId>, BroadcastError> {
        let listed = self
            .connections
            .list_all()
            .await
            .map_err(|e| BroadcastError::RegistryUnavailable(e.to_string()))?;

        Ok(listed
            .into_iter()
            .filter(|id| Some(id) != exclude)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }

    async fn fan_out(&self, recipients: Vec<ConnectionId>, payload: &str) -> Vec<DeliveryReport> {
        let pusher = self.message_pusher.as_ref();
        let timeout = self.settings.delivery_timeout;

        stream::iter(recipients)
            .map(|recipient| async move {
                let result = push_with_timeout(pusher, &recipient, payload, timeout).await;
                if let Err(e) = &result {
                    tracing::debug!("delivery to '{}' failed: {}", recipient, e);
                }
                DeliveryReport { recipient, result }
            })
            .buffer_unordered(self.settings.fanout_concurrency.max(1))
            .collect()
            .await
    }
}

fn collect_delivery_errors(outcome: &mut BroadcastOutcome) {
    let messages: Vec<String> = outcome.failed().map(|(_, e)| e.to_string()).collect();
    for message in messages {
        outcome.errors.push(message);
    }
}
