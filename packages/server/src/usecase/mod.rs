//! UseCase 層
//!
//! トランスポートのイベント 1 件ごとに呼ばれる、状態を持たない処理です。
//! ストアと配信チャネルは trait 経由で注入されます。

pub mod broadcast;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod payload;
pub mod query;
pub mod reap;
pub mod reject_unroutable;
pub mod reply;
pub mod send_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use broadcast::{
    BroadcastEngine, BroadcastOutcome, BroadcastReply, BroadcastSettings, DeliveryReport,
};
pub use connect_participant::{ConnectOutcome, ConnectParticipantUseCase, ConnectRequest};
pub use disconnect_participant::{DisconnectOutcome, DisconnectParticipantUseCase};
pub use error::{BroadcastError, ConnectError, ErrorList};
pub use query::HistoryQueryUseCase;
pub use reap::{ConnectionReaper, ReapPolicy, ReapReport};
pub use reject_unroutable::RejectUnroutableUseCase;
pub use reply::SenderReply;
pub use send_message::{SendMessageOutcome, SendMessageUseCase};
