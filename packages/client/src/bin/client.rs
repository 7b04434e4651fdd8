//! Kairo CLI chat client with heartbeat and reconnection support.
//!
//! Connects to a Kairo relay and sends messages from stdin.
//! Sends a `ping` heartbeat while idle and ignores the `pong` replies.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval);
//! a rejected token exits immediately.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairo-client -- --token <jwt>
//! KAIRO_TOKEN=<jwt> cargo run --bin kairo-client -- --url ws://127.0.0.1:8080/ws
//! ```

use std::time::Duration;

use clap::Parser;
use kairo_client::{SessionOptions, run_client};
use kairo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kairo-client")]
#[command(about = "CLI client for the Kairo WebSocket chat relay", long_about = None)]
struct Args {
    /// WebSocket relay URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Bearer token (omit for relays running without a JWT secret)
    #[arg(short = 't', long, env = "KAIRO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Heartbeat interval in seconds (0 disables the heartbeat)
    #[arg(long, default_value_t = 30)]
    heartbeat_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let options = SessionOptions {
        url: args.url,
        token: args.token,
        heartbeat: Duration::from_secs(args.heartbeat_secs),
    };

    if let Err(e) = run_client(options).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
