// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a client connection.

use super::guard::ConnectionGuard;
use crate::core::info::InfoProducer;
use crate::core::protocol::{Reply, Request, RequestCodec};
use crate::core::state::ServerState;
use crate::core::StatusError;
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::{OwnedSemaphorePermit, broadcast};
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

/// Manages the full lifecycle of a client connection.
///
/// The loop is `await request -> dispatch -> send reply`, repeated until the
/// peer closes, a read or write fails, the idle timeout fires, or the server
/// shuts down. Shutdown is only observed while waiting for a request, so a
/// reply that is being written is always finished.
pub struct ConnectionHandler<S = TcpStream> {
    framed: Framed<S, RequestCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    shutdown_rx: broadcast::Receiver<()>,
    permit: Option<OwnedSemaphorePermit>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new `ConnectionHandler`.
    pub fn new(
        socket: S,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        shutdown_rx: broadcast::Receiver<()>,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Self {
        let codec = RequestCodec::new(state.config.framing, state.config.max_request_bytes);
        Self {
            framed: Framed::new(socket, codec),
            addr,
            state,
            session_id,
            shutdown_rx,
            permit,
        }
    }

    /// The main loop for the connection. Returns an error only when writing a
    /// reply failed; every other ending is a normal close.
    pub async fn run(&mut self) -> Result<(), StatusError> {
        let _guard = ConnectionGuard::new(
            self.state.clone(),
            self.session_id,
            self.addr,
            self.permit.take(),
        );
        let read_timeout = self.state.config.read_timeout;

        loop {
            let next = tokio::select! {
                // Prioritize the shutdown signal over reading.
                biased;
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received shutdown signal.", self.addr);
                    break;
                }
                result = next_request(&mut self.framed, read_timeout) => result,
            };

            match next {
                Ok(Some(request)) => {
                    debug!(
                        "Session {}: Received request from {}: {:?}",
                        self.session_id,
                        self.addr,
                        request.display_lossy()
                    );
                    let reply = self.handle_request(&request);
                    let is_error = reply.is_error();
                    self.framed.send(reply).await?;
                    if is_error {
                        debug!(
                            "Session {}: Sent error reply to {} for invalid request.",
                            self.session_id, self.addr
                        );
                    } else {
                        debug!("Session {}: Sent system data to {}.", self.session_id, self.addr);
                    }
                }
                Ok(None) => {
                    debug!("Connection from {} closed by peer.", self.addr);
                    break;
                }
                Err(StatusError::ReadTimeout(limit)) => {
                    info!("Closing idle connection from {} after {:?}.", self.addr, limit);
                    break;
                }
                Err(e) => {
                    if is_normal_disconnect(&e) {
                        debug!("Connection from {} closed by peer: {}", self.addr, e);
                    } else {
                        warn!("Connection error for {}: {}", self.addr, e);
                    }
                    break;
                }
            }
        }
        Ok(())
    }

    /// Builds the reply for one request and updates the counters.
    fn handle_request(&self, request: &Request) -> Reply {
        let reply = dispatch(request, &self.state.config.command, &self.state.producer);
        if reply.is_error() {
            self.state.stats.increment_invalid_requests();
        } else {
            self.state.stats.increment_requests_served();
        }
        reply
    }
}

/// Classifies a request: the recognized command gets a fresh snapshot,
/// anything else (including non-UTF-8 bytes) gets the error reply.
pub fn dispatch(request: &Request, command: &str, producer: &InfoProducer) -> Reply {
    if request.matches(command) {
        Reply::Status(producer.snapshot())
    } else {
        Reply::invalid_request(command)
    }
}

/// Waits for the next request, bounded by the idle timeout when one is set.
async fn next_request<S>(
    framed: &mut Framed<S, RequestCodec>,
    read_timeout: Option<Duration>,
) -> Result<Option<Request>, StatusError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match read_timeout {
        None => framed.next().await.transpose(),
        Some(limit) => match tokio::time::timeout(limit, framed.next()).await {
            Ok(result) => result.transpose(),
            Err(_) => Err(StatusError::ReadTimeout(limit)),
        },
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &StatusError) -> bool {
    matches!(e, StatusError::Io(io_err) if matches!(
        io_err.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
