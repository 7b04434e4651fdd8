//! WebSocket frame DTOs and route resolution.

use serde::{Deserialize, Serialize};

/// Route key that carries a chat message.
pub const SEND_MESSAGE_ACTION: &str = "sendmessage";

/// Inbound text frame body, e.g. `{"action": "sendmessage", "message": "hi"}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Where an inbound frame is dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundRoute {
    /// Chat message; the body may still be empty and is validated downstream.
    SendMessage(String),
    Unroutable,
}

impl InboundFrame {
    pub fn route(self) -> InboundRoute {
        match (self.action.as_deref(), self.message) {
            (Some(action), message) if action.eq_ignore_ascii_case(SEND_MESSAGE_ACTION) => {
                InboundRoute::SendMessage(message.unwrap_or_default())
            }
            (None, Some(message)) => InboundRoute::SendMessage(message),
            _ => InboundRoute::Unroutable,
        }
    }
}

/// Resolve the route of a raw text frame. Anything that is not a JSON object
/// matching [`InboundFrame`] is unroutable.
pub fn resolve_route(text: &str) -> InboundRoute {
    serde_json::from_str::<InboundFrame>(text)
        .map(InboundFrame::route)
        .unwrap_or(InboundRoute::Unroutable)
}

/// Direct reply to the sender, shaped like an HTTP-style route response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: serde_json::Value,
}

impl RouteResponse {
    pub fn bad_request(reason: &str) -> Self {
        Self {
            status_code: 400,
            body: serde_json::Value::String(reason.to_string()),
        }
    }

    pub fn server_error(errors: Vec<String>) -> Self {
        Self {
            status_code: 500,
            body: serde_json::json!({ "errors": errors }),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"statusCode\":{}}}", self.status_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_route() {
        // テスト項目: フレームの内容から送信ルートか不明ルートかが決まる
        // given (前提条件):
        let cases = [
            (r#"{"action":"sendmessage","message":"hi"}"#, InboundRoute::SendMessage("hi".to_string())),
            (r#"{"action":"sendmessage"}"#, InboundRoute::SendMessage(String::new())),
            (r#"{"message":"hi"}"#, InboundRoute::SendMessage("hi".to_string())),
            (r#"{"action":"dance","message":"hi"}"#, InboundRoute::Unroutable),
            (r#"{"foo":1}"#, InboundRoute::Unroutable),
            (r#"{"message":42}"#, InboundRoute::Unroutable),
            ("plain text", InboundRoute::Unroutable),
        ];

        for (text, expected) in cases {
            // when (操作):
            let route = resolve_route(text);

            // then (期待する結果):
            assert_eq!(route, expected, "frame: {text}");
        }
    }

    #[test]
    fn test_route_response_wire_shape() {
        // テスト項目: 400 応答が statusCode と body を持つ
        // given (前提条件):
        let response = RouteResponse::bad_request("Message cannot be empty");

        // when (操作):
        let value: serde_json::Value = serde_json::from_str(&response.to_json()).unwrap();

        // then (期待する結果):
        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["body"], "Message cannot be empty");
    }
}
