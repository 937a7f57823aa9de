//! HTTP and WebSocket surface of the chat relay.

mod handler;
pub mod identity;
mod runner;
mod signal;
pub mod state;

pub use runner::{create_router, run, serve};
