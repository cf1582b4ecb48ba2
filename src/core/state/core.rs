// src/core/state/core.rs

//! Defines the central `ServerState` struct, holding all shared server-wide state.

use super::stats::StatsState;
use crate::config::Config;
use crate::core::info::InfoProducer;

/// The state shared by the listener and every session handler.
/// Wrapped in an `Arc`; nothing in it is mutated except the atomic counters.
#[derive(Debug)]
pub struct ServerState {
    /// The resolved configuration. Fixed for the lifetime of the server.
    pub config: Config,
    /// Builds the reply for each recognized request.
    pub producer: InfoProducer,
    /// Server-wide counters.
    pub stats: StatsState,
}

impl ServerState {
    pub fn new(config: Config, producer: InfoProducer) -> Self {
        Self {
            config,
            producer,
            stats: StatsState::new(),
        }
    }
}
