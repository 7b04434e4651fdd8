//! Logging setup utilities for the Kairo chat relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the default level when `RUST_LOG` is unset.
const RELAY_CRATES: [&str; 3] = ["kairo_shared", "kairo_server", "kairo_client"];

/// Build the default filter directive for the given binary and level.
///
/// ```
/// use kairo_shared::logger::default_filter;
///
/// let filter = default_filter("kairo-server", "debug");
/// assert!(filter.contains("kairo_server=debug"));
/// ```
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = RELAY_CRATES
        .iter()
        .map(|krate| format!("{}={}", krate, default_log_level))
        .collect();
    directives.push(format!(
        "{}={}",
        binary_name.replace('-', "_"),
        default_log_level
    ));
    directives.push(format!("tower_http={}", default_log_level));
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "kairo-server", "kairo-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use kairo_shared::logger::setup_logger;
///
/// setup_logger("kairo-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_covers_relay_crates_and_binary() {
        // テスト項目: デフォルトフィルタに全クレートとバイナリ名が含まれる
        // given (前提条件):
        let binary_name = "kairo-client";

        // when (操作):
        let filter = default_filter(binary_name, "info");

        // then (期待する結果):
        assert!(filter.contains("kairo_shared=info"));
        assert!(filter.contains("kairo_server=info"));
        assert!(filter.contains("kairo_client=info"));
        assert!(filter.contains("tower_http=info"));
        assert!(!filter.contains("kairo-client"));
    }
}
