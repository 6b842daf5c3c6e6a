//! # Error Types
//!
//! Custom error types for Touch Pilot using `thiserror`.

use thiserror::Error;

/// Main error type for Touch Pilot
#[derive(Debug, Error)]
pub enum TouchPilotError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Touchscreen device errors
    #[error("Touchscreen error: {0}")]
    Touchscreen(String),

    /// No multitouch device found under /dev/input
    #[error("No multitouch touchscreen found")]
    TouchscreenNotFound,

    /// Malformed line in a replay file
    #[error("Replay file line {line}: {source}")]
    Replay {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to deliver one message to the vehicle endpoint.
///
/// Never fatal: the dispatcher logs it and drops the message.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, timeout, DNS failure or request build error
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status
    #[error("endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

/// Result type alias for Touch Pilot
pub type Result<T> = std::result::Result<T, TouchPilotError>;
