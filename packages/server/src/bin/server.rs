//! Kairo WebSocket chat relay server.
//!
//! Receives messages from clients and broadcasts them to all other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairo-server
//! cargo run --bin kairo-server -- --host 0.0.0.0 --port 3000 --jwt-secret s3cret
//! ```

use std::time::Duration;

use clap::Parser;
use kairo_server::{
    app::build_state,
    config::{DEFAULT_OUTBOUND_BUFFER, RelayConfig},
    ui::Server,
    usecase::{BroadcastSettings, ReapPolicy},
};
use kairo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kairo-server")]
#[command(about = "WebSocket chat relay with fan-out broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// HS256 secret for validating client tokens (anonymous access when unset)
    #[arg(long, env = "KAIRO_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Maximum number of deliveries in flight per broadcast
    #[arg(long, default_value_t = 16)]
    fanout_concurrency: usize,

    /// Per-recipient delivery timeout in milliseconds
    #[arg(long, default_value_t = 3000)]
    delivery_timeout_ms: u64,

    /// Capacity of each connection's outbound queue
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    outbound_buffer: usize,

    /// Which failed recipients are removed from the registry
    /// (disabled, gone-only, all-failures)
    #[arg(long, default_value = "gone-only")]
    reap_policy: ReapPolicy,

    /// Also deliver chat messages back to their sender
    #[arg(long)]
    echo_to_sender: bool,
}

impl From<Args> for RelayConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            jwt_secret: args.jwt_secret,
            broadcast: BroadcastSettings {
                fanout_concurrency: args.fanout_concurrency,
                delivery_timeout: Duration::from_millis(args.delivery_timeout_ms),
            },
            outbound_buffer: args.outbound_buffer,
            reap_policy: args.reap_policy,
            echo_to_sender: args.echo_to_sender,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = RelayConfig::from(Args::parse());
    let state = build_state(&config);

    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
