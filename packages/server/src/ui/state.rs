//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, HistoryQueryUseCase,
    RejectUnroutableUseCase, SendMessageUseCase, SenderReply,
};

/// Use cases handed to every handler invocation
pub struct AppState {
    /// ConnectParticipantUseCase（接続受け入れ）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（切断処理）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージのブロードキャスト）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// RejectUnroutableUseCase（不明ルートへの返信）
    pub reject_unroutable_usecase: Arc<RejectUnroutableUseCase>,
    /// HistoryQueryUseCase（HTTP 参照 API）
    pub history_query_usecase: Arc<HistoryQueryUseCase>,
    /// SenderReply（送信者本人への直接返信、配信タイムアウト付き）
    pub sender_reply: Arc<SenderReply>,
    /// Capacity of each connection's outbound channel
    pub outbound_buffer: usize,
}
