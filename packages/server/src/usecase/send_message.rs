//! UseCase: メッセージ送信処理
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ブロードキャストと、配信失敗した接続の回収
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者以外へのブロードキャスト
//! - 異常系：空メッセージ、配信失敗（消えた接続は回収される）
//! - エッジケース：`ping`、送信者へのエコー設定

use std::sync::Arc;

use crate::domain::ConnectionId;

use super::{
    broadcast::{BroadcastEngine, BroadcastOutcome, BroadcastReply},
    error::BroadcastError,
    reap::ConnectionReaper,
};

/// メッセージ送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageOutcome {
    Pong,
    Relayed {
        outcome: BroadcastOutcome,
        reaped: Vec<ConnectionId>,
    },
}

impl SendMessageOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::Pong => "pong",
            Self::Relayed { outcome, .. } if outcome.errors.is_empty() => {
                "Message broadcast completed"
            }
            Self::Relayed { .. } => "Message broadcast with errors",
        }
    }
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    engine: Arc<BroadcastEngine>,
    reaper: Arc<ConnectionReaper>,
    /// 送信者自身にもメッセージを返すか
    echo_to_sender: bool,
}

impl SendMessageUseCase {
    pub fn new(engine: Arc<BroadcastEngine>, reaper: Arc<ConnectionReaper>, echo_to_sender: bool) -> Self {
        Self {
            engine,
            reaper,
            echo_to_sender,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(SendMessageOutcome)` - pong、または配信を試みた（失敗は outcome 内）
    /// * `Err(BroadcastError)` - 空メッセージ、またはレジストリを列挙できない
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        message: &str,
    ) -> Result<SendMessageOutcome, BroadcastError> {
        let reply = self
            .engine
            .broadcast(message, sender, !self.echo_to_sender)
            .await?;

        let mut outcome = match reply {
            BroadcastReply::Pong => return Ok(SendMessageOutcome::Pong),
            BroadcastReply::Relayed(outcome) => outcome,
        };

        let report = self.reaper.reap(&outcome).await;
        outcome.errors.extend(report.errors);

        Ok(SendMessageOutcome::Relayed {
            outcome,
            reaped: report.reaped,
        })
    }
}
