// src/server/mod.rs

use crate::config::Config;
use crate::core::info::InfoProducer;
use anyhow::Result;
use tracing::{error, info};

mod connection_loop;
mod context;
mod initialization;

pub use context::ServerContext;
pub use initialization::setup as bind;

/// The main server startup function: bind, then serve until SIGINT or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let producer = InfoProducer::system(&config.device_interface);

    // 1. Initialize shared state and the listener. Failure here is fatal.
    let server_context = initialization::setup(config, producer).await?;

    // 2. Accept connections until a termination signal arrives.
    server_context.serve(shutdown_signal()).await;

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM (Ctrl-C elsewhere).
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => info!("SIGINT received, initiating graceful shutdown."),
                    _ = sigterm.recv() => info!("SIGTERM received, initiating graceful shutdown."),
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to register signal handlers: {}. Falling back to Ctrl-C.", e);
            }
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Ctrl-C received, initiating graceful shutdown.");
}
