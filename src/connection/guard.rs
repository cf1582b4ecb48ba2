// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection resource management.

use crate::core::state::ServerState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::OwnedSemaphorePermit;
use tracing::info;

/// An RAII guard to ensure connection resources are always released when a
/// connection handler's scope is exited, however the session ended.
pub struct ConnectionGuard {
    /// A shared reference to the server state.
    pub(crate) state: Arc<ServerState>,
    /// The unique identifier for the client session.
    pub(crate) session_id: u64,
    /// The network address of the client.
    pub(crate) addr: SocketAddr,
    /// The admission slot held by this session, when `max_clients` is set.
    _permit: Option<OwnedSemaphorePermit>,
}

impl ConnectionGuard {
    /// Creates a new `ConnectionGuard` and counts the session as active.
    pub(crate) fn new(
        state: Arc<ServerState>,
        session_id: u64,
        addr: SocketAddr,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Self {
        state.stats.session_opened();
        Self {
            state,
            session_id,
            addr,
            _permit: permit,
        }
    }
}

impl Drop for ConnectionGuard {
    /// Releases the admission slot and updates the active-session count.
    fn drop(&mut self) {
        self.state.stats.session_closed();
        info!(
            "[CONNECTION CLOSED] {} disconnected (session {}).",
            self.addr, self.session_id
        );
    }
}
