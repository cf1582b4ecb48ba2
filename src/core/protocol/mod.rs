// src/core/protocol/mod.rs

pub mod reply;
pub mod request;
pub use reply::Reply;
pub use request::{Request, RequestCodec};
