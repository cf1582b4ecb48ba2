// src/core/protocol/reply.rs

//! The two reply shapes a session can send.

use crate::core::info::StatusSnapshot;
use serde::Serialize;

/// A reply to one request. Serialized untagged, so the wire carries either the
/// bare snapshot object or `{"error": "..."}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Reply {
    Status(StatusSnapshot),
    Error { error: String },
}

impl Reply {
    /// The reply for anything that is not the recognized command.
    pub fn invalid_request(command: &str) -> Self {
        Reply::Error {
            error: format!("Invalid request. Expected '{command}'."),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error { .. })
    }
}
