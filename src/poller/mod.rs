// src/poller/mod.rs

//! The polling client mode (`--poll`).
//!
//! Each cycle connects to the server, sends the command, reads one reply,
//! renders it and then sleeps for the configured interval. Every failure is
//! logged and the cycle ends in the same sleep; the loop only stops when the
//! shutdown future resolves.

pub mod client;
pub mod render;

pub use client::StatusClient;
pub use render::{Rendered, render_response};

use crate::config::{Config, Framing, PollerConfig};
use crate::core::StatusError;
use anyhow::Result;
use std::future::Future;
use tracing::{debug, error, info, warn};

/// Runs polling cycles against one server.
#[derive(Debug, Clone)]
pub struct Poller {
    target: String,
    command: String,
    framing: Framing,
    settings: PollerConfig,
}

impl Poller {
    pub fn new(config: &Config) -> Self {
        Self {
            target: format!(
                "{}:{}",
                config.poller.server_host, config.poller.server_port
            ),
            command: config.command.clone(),
            framing: config.framing,
            settings: config.poller.clone(),
        }
    }

    /// The `host:port` this poller connects to.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Performs one connect/request/render cycle without sleeping.
    pub async fn poll_once(&self) -> Result<Rendered, StatusError> {
        let mut client = StatusClient::connect(
            &self.target,
            self.settings.connect_timeout,
            self.framing,
            self.settings.max_response_bytes,
        )
        .await?
        .with_reply_timeout(self.settings.reply_timeout);
        info!("Connected to the server.");

        client.send_command(&self.command).await?;
        debug!("Sent request: {}", self.command);

        let raw = client.read_reply().await?;
        drop(client);
        info!("Connection closed.");

        Ok(render_response(&raw))
    }

    /// Polls until `shutdown` resolves and returns the number of completed cycles.
    pub async fn run<F>(&self, shutdown: F) -> u64
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles: u64 = 0;

        loop {
            info!("Attempting to connect to {}...", self.target);
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                outcome = self.poll_once() => outcome,
            };

            match outcome {
                Ok(Rendered::Status(text)) => println!("{text}"),
                Ok(Rendered::NonJson(text)) => {
                    warn!("Server reply was not valid JSON.");
                    println!("{text}");
                }
                Err(e) if e.is_connection_refused() => {
                    warn!("Connection failed. Is the server running? ({})", e);
                }
                Err(e) => error!("An error occurred: {}", e),
            }
            cycles += 1;

            info!(
                "Waiting for {:?} before the next request...",
                self.settings.interval
            );
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
        }

        info!("Poller stopped after {} cycle(s).", cycles);
        cycles
    }
}

/// The main entry point for running in poller mode; stops on Ctrl-C.
pub async fn run(config: Config) -> Result<()> {
    let poller = Poller::new(&config);
    info!(
        "Polling {} every {:?} with command '{}'.",
        poller.target(),
        config.poller.interval,
        config.command
    );
    if config.framing == Framing::Raw && config.poller.max_response_bytes < 2048 {
        warn!(
            "poller.max_response_bytes is {} with raw framing; status replies may be truncated.",
            config.poller.max_response_bytes
        );
    }
    poller.run(crate::server::shutdown_signal()).await;
    Ok(())
}
