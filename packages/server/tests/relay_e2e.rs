//! End-to-end tests: the relay router on an ephemeral port driven by real
//! WebSocket clients.

use std::time::Duration;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use kairo_server::{app::build_state, config::RelayConfig, ui::Server};
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, Message, client::IntoClientRequest, http::HeaderValue},
};

const SECRET: &str = "e2e-secret";
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Relay running in-process for the duration of a test
struct TestRelay {
    port: u16,
    handle: JoinHandle<()>,
}

impl TestRelay {
    async fn start() -> Self {
        let config = RelayConfig {
            jwt_secret: Some(SECRET.to_string()),
            ..RelayConfig::default()
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = Server::new(build_state(&config));
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });
        TestRelay { port, handle }
    }

    fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    async fn connect(&self, user_id: &str) -> Socket {
        let mut request = self.ws_url().into_client_request().unwrap();
        let bearer = format!("Bearer {}", token(user_id));
        request
            .headers_mut()
            .insert("Authorization", HeaderValue::from_str(&bearer).unwrap());
        let (socket, _) = connect_async(request).await.unwrap();
        socket
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn token(user_id: &str) -> String {
    let claims = json!({
        "user_id": user_id,
        "exp": Utc::now().timestamp() + 3600,
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

/// Next text frame parsed as JSON
async fn next_json(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

async fn send_json(socket: &mut Socket, value: Value) {
    socket
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_broadcast_round_trip() {
    // テスト項目: 送信者以外にメッセージが届き、送信者には届かない
    // given (前提条件):
    let relay = TestRelay::start().await;
    let mut alice = relay.connect("alice").await;
    let mut bob = relay.connect("bob").await;

    // alice には bob の入室通知が届く
    let joined = next_json(&mut alice).await;
    assert!(
        joined["message"]
            .as_str()
            .unwrap()
            .starts_with("A new user has joined the chat - ")
    );

    // when (操作):
    send_json(&mut bob, json!({"action": "sendmessage", "message": "hello"})).await;
    send_json(&mut bob, json!({"action": "sendmessage", "message": "ping"})).await;

    // then (期待する結果):
    let relayed = next_json(&mut alice).await;
    let text = relayed["message"].as_str().unwrap();
    assert!(text.starts_with('['));
    assert!(text.ends_with("  hello\n"));

    // bob への次のフレームは自分のメッセージではなく pong
    let pong = next_json(&mut bob).await;
    assert_eq!(pong, json!({"message": "pong"}));
}

#[tokio::test]
async fn test_direct_replies() {
    // テスト項目: 空メッセージと不明なフレームには送信者本人にだけ返信がある
    // given (前提条件):
    let relay = TestRelay::start().await;
    let mut alice = relay.connect("alice").await;

    // when (操作):
    send_json(&mut alice, json!({"action": "sendmessage", "message": "   "})).await;
    alice
        .send(Message::Text("not json".to_string().into()))
        .await
        .unwrap();

    // then (期待する結果):
    let rejected = next_json(&mut alice).await;
    assert_eq!(rejected["statusCode"], 400);
    assert_eq!(rejected["body"], "Message cannot be empty");

    let invalid = next_json(&mut alice).await;
    assert_eq!(invalid["error"], "Invalid request");
}

#[tokio::test]
async fn test_unauthorized_connection_is_refused() {
    // テスト項目: トークンのない接続は 401 で拒否され、レジストリに残らない
    // given (前提条件):
    let relay = TestRelay::start().await;

    // when (操作):
    let result = connect_async(relay.ws_url()).await;

    // then (期待する結果):
    match result {
        Err(tungstenite::Error::Http(response)) => assert_eq!(response.status(), 401),
        other => panic!("expected HTTP 401, got {:?}", other.map(|_| ())),
    }
    let list: Value = reqwest::get(relay.http_url("/api/connections"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_disconnect_notifies_and_closes_session() {
    // テスト項目: 切断すると残りの参加者に退室通知が届き、台帳が閉じられる
    // given (前提条件):
    let relay = TestRelay::start().await;
    let mut alice = relay.connect("alice").await;
    let mut bob = relay.connect("bob").await;
    let joined = next_json(&mut alice).await;
    let bob_id = joined["message"]
        .as_str()
        .unwrap()
        .trim_start_matches("A new user has joined the chat - ")
        .to_string();

    // when (操作):
    bob.close(None).await.unwrap();

    // then (期待する結果):
    let left = next_json(&mut alice).await;
    assert_eq!(left["message"], format!("User {} has left the chat.", bob_id));

    let session: Value = reqwest::get(relay.http_url(&format!("/api/sessions/{}", bob_id)))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["principal_id"], "bob");
    assert!(session["disconnected_at"].is_string());
    assert!(session["duration_secs"].as_i64().unwrap() >= 0);

    // レジストリからの削除は退室通知の後に行われる
    let mut count = Value::Null;
    for _ in 0..50 {
        let list: Value = reqwest::get(relay.http_url("/api/connections"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        count = list["count"].clone();
        if count == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(count, 1);
}
