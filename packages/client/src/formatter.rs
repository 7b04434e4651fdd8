//! Message formatting utilities for client display.

use chrono::{DateTime, Utc};
use kairo_server::infrastructure::dto::websocket::RouteResponse;
use kairo_shared::time::format_wire_timestamp;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a chat message or system notice relayed by the server
    ///
    /// Chat payloads already carry `[<ts> - UTC]\n <sender>  <text>\n`.
    pub fn format_message(message: &str) -> String {
        let body = message.trim_end_matches('\n');
        format!(
            "\n------------------------------------------------------------\n\
             {}\n\
             ------------------------------------------------------------\n",
            body
        )
    }

    /// Format a direct status reply (rejected or failed send)
    pub fn format_reply(reply: &RouteResponse) -> String {
        let body = match &reply.body {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        format!("\n! [{}] {}\n", reply.status_code, body)
    }

    /// Format the relay's invalid-request notice
    pub fn format_invalid(error: &str, message: &str) -> String {
        format!("\n! {}: {}\n", error, message)
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(sent_at: DateTime<Utc>) -> String {
        format!("sent at {} UTC\n", format_wire_timestamp(&sent_at))
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairo_shared::time::parse_wire_timestamp;

    #[test]
    fn test_format_message() {
        // テスト項目: チャットメッセージが区切り線付きで表示される
        // given (前提条件):
        let message = "[2024-01-01T00:05:30Z - UTC]\n alice  Hello, world!\n";

        // when (操作):
        let result = MessageFormatter::format_message(message);

        // then (期待する結果):
        assert!(result.contains("2024-01-01T00:05:30Z - UTC"));
        assert!(result.contains("alice  Hello, world!"));
        assert!(result.contains("------------------------------------------------------------"));
    }

    #[test]
    fn test_format_reply() {
        // テスト項目: ステータス付き返信がコードと本文で表示される
        // given (前提条件):
        let reply = RouteResponse::bad_request("Message cannot be empty");

        // when (操作):
        let result = MessageFormatter::format_reply(&reply);

        // then (期待する結果):
        assert!(result.contains("[400] Message cannot be empty"));
    }

    #[test]
    fn test_format_sent_confirmation() {
        // テスト項目: 送信確認メッセージが wire 形式の時刻で表示される
        // given (前提条件):
        let sent_at = parse_wire_timestamp("2023-01-01T00:00:00Z").unwrap();

        // when (操作):
        let result = MessageFormatter::format_sent_confirmation(sent_at);

        // then (期待する結果):
        assert_eq!(result, "sent at 2023-01-01T00:00:00Z UTC\n");
    }

    #[test]
    fn test_format_binary_message() {
        // テスト項目: バイナリメッセージ通知が正しくフォーマットされる
        // given (前提条件):
        let byte_count = 1024;

        // when (操作):
        let result = MessageFormatter::format_binary_message(byte_count);

        // then (期待する結果):
        assert!(result.contains("1024 bytes"));
    }
}
