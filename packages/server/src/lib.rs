//! Hiroba chat relay library.
//!
//! A single shared room relays short messages between WebSocket clients.
//! The room is an actor owning the membership set; each connection runs an
//! inbound and an outbound pump around a bounded per-client queue, and a
//! client that cannot keep up is evicted instead of slowing everyone down.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{create_router, run as run_server, serve};
