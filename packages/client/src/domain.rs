//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use kairo_server::infrastructure::dto::websocket::{RouteResponse, SEND_MESSAGE_ACTION};
use serde::Deserialize;
use serde_json::json;

use crate::error::ClientError;

/// Control token used for the heartbeat
pub const HEARTBEAT_TOKEN: &str = "ping";
const PONG: &str = "pong";

/// Check if the client should exit immediately based on the error type.
///
/// An unauthorized credential will not become valid by retrying.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::Unauthorized)
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Frame sent for one line of user input (or the heartbeat)
pub fn outgoing_frame(message: &str) -> String {
    json!({ "action": SEND_MESSAGE_ACTION, "message": message }).to_string()
}

#[derive(Debug, Deserialize)]
struct MessageFrame {
    message: String,
}

#[derive(Debug, Deserialize)]
struct InvalidRequestFrame {
    error: String,
    message: String,
}

/// What the relay sent us
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    /// Heartbeat acknowledgment, not shown
    Pong,
    /// Chat message or system notice
    Message(String),
    /// Direct reply with a status code (400 / 500)
    Reply(RouteResponse),
    /// The relay did not recognize our frame
    Invalid { error: String, message: String },
    Raw(String),
}

pub fn classify_incoming(text: &str) -> Incoming {
    if let Ok(frame) = serde_json::from_str::<InvalidRequestFrame>(text) {
        return Incoming::Invalid {
            error: frame.error,
            message: frame.message,
        };
    }
    if let Ok(frame) = serde_json::from_str::<MessageFrame>(text) {
        return if frame.message == PONG {
            Incoming::Pong
        } else {
            Incoming::Message(frame.message)
        };
    }
    if let Ok(reply) = serde_json::from_str::<RouteResponse>(text) {
        return Incoming::Reply(reply);
    }
    Incoming::Raw(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_exit_immediately_with_unauthorized() {
        // テスト項目: Unauthorized エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::Unauthorized;

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_unauthorized() {
        // テスト項目: Unauthorized エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::Unauthorized;

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_outgoing_frame_uses_send_route() {
        // テスト項目: 送信フレームが sendmessage ルートと本文を持つ
        // given (前提条件):
        let line = "hello";

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&outgoing_frame(line)).unwrap();

        // then (期待する結果):
        assert_eq!(value["action"], "sendmessage");
        assert_eq!(value["message"], "hello");
    }

    #[test]
    fn test_classify_incoming() {
        // テスト項目: 受信フレームの種類が判別される
        // given (前提条件):
        let pong = r#"{"message":"pong"}"#;
        let chat = r#"{"message":"[2024-01-01T00:00:00Z - UTC]\n a  hi\n"}"#;
        let reply = r#"{"statusCode":400,"body":"Message cannot be empty"}"#;
        let invalid = r#"{"error":"Invalid request","message":"not recognized"}"#;

        // when (操作):
        let kinds = [pong, chat, reply, invalid, "???"].map(classify_incoming);

        // then (期待する結果):
        assert_eq!(kinds[0], Incoming::Pong);
        assert!(matches!(&kinds[1], Incoming::Message(m) if m.ends_with(" a  hi\n")));
        assert!(matches!(&kinds[2], Incoming::Reply(r) if r.status_code == 400));
        assert!(matches!(&kinds[3], Incoming::Invalid { error, .. } if error == "Invalid request"));
        assert_eq!(kinds[4], Incoming::Raw("???".to_string()));
    }
}
