//! 接続へ送るペイロードの組み立て
//!
//! クライアントは受信した JSON の `message` フィールドを表示します。

use serde_json::json;

use crate::domain::{ConnectionId, MessageContent, Timestamp};

/// チャットメッセージのペイロード（全受信者共通）
pub fn chat_payload(sent_at: Timestamp, sender: &ConnectionId, content: &MessageContent) -> String {
    notice_payload(&format!(
        "[{} - UTC]\n {}  {}\n",
        sent_at.to_wire_string(),
        sender,
        content.as_str()
    ))
}

/// システム通知などの `{"message": ...}` ペイロード
pub fn notice_payload(text: &str) -> String {
    json!({ "message": text }).to_string()
}

pub fn pong_payload() -> String {
    notice_payload("pong")
}

pub fn joined_notice(connection_id: &ConnectionId) -> String {
    format!("A new user has joined the chat - {}", connection_id)
}

pub fn left_notice(connection_id: &ConnectionId) -> String {
    format!("User {} has left the chat.", connection_id)
}

/// 認識できないルートへの返信
pub fn invalid_request_payload() -> String {
    json!({
        "error": "Invalid request",
        "message": "The requested action is not recognized. Please check your WebSocket commands.",
    })
    .to_string()
}
