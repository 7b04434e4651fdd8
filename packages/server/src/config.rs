//! Relay configuration assembled from command-line arguments.

use crate::usecase::{BroadcastSettings, ReapPolicy};

pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Runtime settings of one relay process
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// HS256 secret. Without it every connection is admitted anonymously.
    pub jwt_secret: Option<String>,
    pub broadcast: BroadcastSettings,
    /// Capacity of each connection's outbound channel
    pub outbound_buffer: usize,
    pub reap_policy: ReapPolicy,
    /// Deliver chat messages back to their sender too
    pub echo_to_sender: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            jwt_secret: None,
            broadcast: BroadcastSettings::default(),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            reap_policy: ReapPolicy::default(),
            echo_to_sender: false,
        }
    }
}

impl RelayConfig {
    /// The configured secret, ignoring an empty value
    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref().filter(|secret| !secret.is_empty())
    }
}
