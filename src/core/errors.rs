// src/core/errors.rs

//! Defines the primary error type for sessions, the wire codec, and the poller.

use std::sync::Arc;
use thiserror::Error;

/// The main error enum for everything below the application boundary.
/// Startup and configuration failures use `anyhow` instead.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    /// The peer refused the TCP connection (nothing listening on the port).
    #[error("Connection refused by {0}")]
    ConnectionRefused(String),

    #[error("Timed out connecting to {0}")]
    ConnectTimeout(String),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    /// No request arrived within the configured `read_timeout`.
    #[error("No request received within {0:?}")]
    ReadTimeout(std::time::Duration),

    /// The server sent nothing within the poller's `reply_timeout`.
    #[error("No reply received within {0:?}")]
    ReplyTimeout(std::time::Duration),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Internal Error: {0}")]
    Internal(String),
}

impl StatusError {
    /// Returns true if this is the "nothing is listening" connect failure.
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, StatusError::ConnectionRefused(_))
    }
}

// Manual implementation of Clone because `std::io::Error` is not cloneable.
impl Clone for StatusError {
    fn clone(&self) -> Self {
        match self {
            StatusError::Io(e) => StatusError::Io(Arc::clone(e)),
            StatusError::ConnectionRefused(s) => StatusError::ConnectionRefused(s.clone()),
            StatusError::ConnectTimeout(s) => StatusError::ConnectTimeout(s.clone()),
            StatusError::ConnectionClosed => StatusError::ConnectionClosed,
            StatusError::ReadTimeout(d) => StatusError::ReadTimeout(*d),
            StatusError::ReplyTimeout(d) => StatusError::ReplyTimeout(*d),
            StatusError::Json(s) => StatusError::Json(s.clone()),
            StatusError::Internal(s) => StatusError::Internal(s.clone()),
        }
    }
}

impl PartialEq for StatusError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StatusError::Io(e1), StatusError::Io(e2)) => e1.kind() == e2.kind(),
            (StatusError::ConnectionRefused(a), StatusError::ConnectionRefused(b)) => a == b,
            (StatusError::ConnectTimeout(a), StatusError::ConnectTimeout(b)) => a == b,
            (StatusError::ReadTimeout(a), StatusError::ReadTimeout(b)) => a == b,
            (StatusError::ReplyTimeout(a), StatusError::ReplyTimeout(b)) => a == b,
            (StatusError::Json(a), StatusError::Json(b)) => a == b,
            (StatusError::Internal(a), StatusError::Internal(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

// --- From trait implementations for easy error conversion ---

impl From<std::io::Error> for StatusError {
    fn from(e: std::io::Error) -> Self {
        StatusError::Io(Arc::new(e))
    }
}

impl From<serde_json::Error> for StatusError {
    fn from(e: serde_json::Error) -> Self {
        StatusError::Json(e.to_string())
    }
}

