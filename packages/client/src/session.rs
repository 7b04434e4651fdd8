//! WebSocket client session management.

use std::time::Duration;

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        self, client::IntoClientRequest, http::HeaderValue, http::StatusCode,
        protocol::Message,
    },
};

use crate::{
    domain::{HEARTBEAT_TOKEN, Incoming, classify_incoming, outgoing_frame},
    error::ClientError,
};

use super::{
    formatter::MessageFormatter,
    ui::{PROMPT, redisplay_prompt},
};

/// Connection settings for one session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub url: String,
    /// Bearer token sent in the `Authorization` header
    pub token: Option<String>,
    /// Interval of the `ping` heartbeat; zero disables it
    pub heartbeat: Duration,
}

/// What the input side of the session produces
enum Outgoing {
    Line(String),
    Heartbeat,
}

/// Run the WebSocket client session
pub async fn run_client_session(options: &SessionOptions) -> Result<(), ClientError> {
    let mut request = options
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    if let Some(token) = &options.token {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
        request.headers_mut().insert("Authorization", value);
    }

    let (ws_stream, _response) = match connect_async(request).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response)) if response.status() == StatusCode::UNAUTHORIZED => {
            return Err(ClientError::Unauthorized);
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat relay!");
    println!("\nType messages and press Enter to send. Press Ctrl+C to exit.\n");

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            let formatted = match message {
                Ok(Message::Text(text)) => match classify_incoming(text.as_str()) {
                    Incoming::Pong => continue,
                    Incoming::Message(message) => MessageFormatter::format_message(&message),
                    Incoming::Reply(reply) => MessageFormatter::format_reply(&reply),
                    Incoming::Invalid { error, message } => {
                        MessageFormatter::format_invalid(&error, &message)
                    }
                    Incoming::Raw(text) => MessageFormatter::format_raw_message(&text),
                },
                Ok(Message::Binary(data)) => MessageFormatter::format_binary_message(data.len()),
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => continue,
            };
            print!("{}", formatted);
            redisplay_prompt();
        }

        connection_error
    });

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<Outgoing>();

    // Heartbeat keeps idle connections open through proxies
    let heartbeat_task = (!options.heartbeat.is_zero()).then(|| {
        let heartbeat_tx = input_tx.clone();
        let period = options.heartbeat;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                if heartbeat_tx.send(Outgoing::Heartbeat).is_err() {
                    break;
                }
            }
        })
    });

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(Outgoing::Line(line.to_string())).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to send input lines and heartbeats to the relay
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(outgoing) = input_rx.recv().await {
            let (frame, echo) = match outgoing {
                Outgoing::Line(line) => (outgoing_frame(&line), true),
                Outgoing::Heartbeat => (outgoing_frame(HEARTBEAT_TOKEN), false),
            };

            if let Err(e) = write.send(Message::Text(frame.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }

            if echo {
                print!("{}", MessageFormatter::format_sent_confirmation(Utc::now()));
                redisplay_prompt();
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    let result = tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            read_result.unwrap_or(false)
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result.unwrap_or(false)
        }
    };
    if let Some(task) = heartbeat_task {
        task.abort();
    }

    if result {
        return Err(ClientError::ConnectionError("Connection lost".to_string()));
    }
    Ok(())
}
