// src/server/initialization.rs

//! Handles server initialization: building shared state and binding the listener.

use super::context::ServerContext;
use crate::config::Config;
use crate::core::info::InfoProducer;
use crate::core::state::ServerState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{Semaphore, broadcast};
use tracing::{info, warn};

/// Initializes all server components before starting the main loop.
/// A bind failure is returned as an error naming the address.
pub async fn setup(config: Config, producer: InfoProducer) -> Result<ServerContext> {
    log_startup_info(&config);
    let (shutdown_tx, _) = broadcast::channel(1);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    info!(
        "[LISTENING] Server is listening on {}",
        listener
            .local_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| format!("{}:{}", config.host, config.port))
    );

    let connection_permits = config
        .max_clients
        .map(|limit| Arc::new(Semaphore::new(limit)));

    let server_state = Arc::new(ServerState::new(config, producer));
    info!("Server state initialized.");

    Ok(ServerContext {
        state: server_state,
        listener,
        shutdown_tx,
        connection_permits,
    })
}

fn log_startup_info(config: &Config) {
    info!(
        "Recognized command: '{}', framing: {:?}, max request size: {} bytes.",
        config.command, config.framing, config.max_request_bytes
    );
    match config.max_clients {
        Some(limit) => info!("Concurrent sessions limited to {}.", limit),
        None => warn!("No 'max_clients' limit is active. Concurrent sessions are unbounded."),
    }
    match config.read_timeout {
        Some(timeout) => info!("Idle sessions are closed after {:?}.", timeout),
        None => info!("No read timeout configured; idle sessions are kept open."),
    }
}
