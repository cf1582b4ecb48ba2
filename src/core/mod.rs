// src/core/mod.rs

//! The central module containing the protocol, the status producer and shared state.

pub mod errors;
pub mod info;
pub mod protocol;
pub mod state;

pub use errors::StatusError;
pub use info::{InfoProducer, StatusSnapshot};
pub use protocol::{Reply, Request};
