// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling graceful shutdown.

use super::context::ServerContext;
use crate::connection::ConnectionHandler;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Pause after a failed `accept` before trying again.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// The main server loop: accepts connections, spawns one task per session, and
/// on shutdown drains the sessions within the configured grace period.
pub async fn run<F>(ctx: ServerContext, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting connections.");
                break;
            }

            res = ctx.listener.accept() => {
                let (socket, addr) = match res {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        // Errors such as EMFILE repeat until a descriptor frees up.
                        error!("Failed to accept connection: {}", e);
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                        continue;
                    }
                };
                ctx.state.stats.increment_total_connections();

                let permit = match &ctx.connection_permits {
                    Some(permits) => match permits.clone().try_acquire_owned() {
                        Ok(permit) => Some(permit),
                        Err(_) => {
                            warn!(
                                "Rejecting connection from {}: max_clients ({}) reached.",
                                addr,
                                ctx.state.config.max_clients.unwrap_or_default()
                            );
                            ctx.state.stats.increment_rejected_connections();
                            drop(socket);
                            continue;
                        }
                    },
                    None => None,
                };

                session_id_counter = session_id_counter.wrapping_add(1);
                let session_id = session_id_counter;
                info!("[NEW CONNECTION] {} connected (session {}).", addr, session_id);

                let state_clone = ctx.state.clone();
                let shutdown_rx = ctx.shutdown_tx.subscribe();
                client_tasks.spawn(async move {
                    let mut handler = ConnectionHandler::new(
                        socket,
                        addr,
                        state_clone,
                        session_id,
                        shutdown_rx,
                        permit,
                    );
                    if let Err(e) = handler.run().await {
                        warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                    }
                });
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res
                    && e.is_panic()
                {
                    error!("A client handler panicked: {e:?}");
                }
            },
        }
    }

    drop(ctx.listener);

    if ctx.shutdown_tx.send(()).is_err() {
        debug!("No open sessions to notify of shutdown.");
    }

    let grace = ctx.state.config.shutdown_grace;
    info!(
        "Waiting up to {:?} for {} session(s) to finish...",
        grace,
        client_tasks.len()
    );
    if tokio::time::timeout(grace, async {
        while client_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for sessions to finish; aborting the rest.");
        client_tasks.shutdown().await;
    }

    let stats = &ctx.state.stats;
    info!(
        "Server shutdown complete. connections={} rejected={} served={} invalid={}",
        stats.get_total_connections(),
        stats.get_rejected_connections(),
        stats.get_requests_served(),
        stats.get_invalid_requests()
    );
}
