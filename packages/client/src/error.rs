//! Error types for the Kairo chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay refused the credential (HTTP 401)
    #[error("The relay rejected the credential (401 Unauthorized)")]
    Unauthorized,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
