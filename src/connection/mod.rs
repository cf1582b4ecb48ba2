// src/connection/mod.rs

//! Manages the lifecycle of a single client TCP connection: reading requests,
//! dispatching them, and writing one reply per request.

mod guard;
mod handler;

// Publicly re-export the primary types from the sub-modules.
pub use guard::ConnectionGuard;
pub use handler::{ConnectionHandler, dispatch};
