//! Time-related utilities with clock abstraction for testability.
//!
//! All relay timestamps are UTC. On the wire they are rendered with second
//! precision (`2024-01-01T00:05:30Z`).

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Wire format for timestamps (UTC, second precision).
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current instant in UTC
    fn now_utc(&self) -> DateTime<Utc>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given instant
    pub fn new(fixed_time: DateTime<Utc>) -> Self {
        Self { fixed_time }
    }

    /// Create a new fixed clock from a wire-format string.
    ///
    /// Returns `None` when the string is not in [`WIRE_FORMAT`].
    pub fn at(wire: &str) -> Option<Self> {
        parse_wire_timestamp(wire).map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.fixed_time
    }
}

/// Render a timestamp in [`WIRE_FORMAT`].
pub fn format_wire_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(WIRE_FORMAT).to_string()
}

/// Parse a timestamp rendered in [`WIRE_FORMAT`].
pub fn parse_wire_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, WIRE_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
