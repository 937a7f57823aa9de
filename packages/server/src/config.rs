//! Server configuration parsed from the command line.

use clap::Parser;

use crate::usecase::{DEFAULT_FORWARD_CAPACITY, DEFAULT_OUTBOUND_CAPACITY};

/// Default host to bind
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default port to listen on
pub const DEFAULT_PORT: u16 = 3000;

/// Group chat relay over WebSocket
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "hiroba-server", version, about)]
pub struct ServerConfig {
    /// Host address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Per-client outbound queue size; a client whose queue overflows is disconnected
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_CAPACITY, value_parser = parse_capacity)]
    pub outbound_capacity: usize,

    /// Size of the queue carrying incoming messages to the room
    #[arg(long, default_value_t = DEFAULT_FORWARD_CAPACITY, value_parser = parse_capacity)]
    pub forward_capacity: usize,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            forward_capacity: DEFAULT_FORWARD_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    let capacity: usize = value
        .parse()
        .map_err(|e| format!("`{value}` is not a valid capacity: {e}"))?;
    if capacity == 0 {
        return Err("capacity must be at least 1".to_string());
    }
    Ok(capacity)
}
