//! Test fixtures: an in-process server bound to an ephemeral port.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use hiroba_server::ServerConfig;
use tokio::{net::TcpListener, sync::oneshot};

pub const WAIT: Duration = Duration::from_secs(5);

/// A running server, shut down on drop
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    /// Start a server with the default configuration
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    /// Start a server with a custom configuration (host and port are ignored)
    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = hiroba_server::serve(listener, config, shutdown).await {
                eprintln!("test server stopped with error: {e}");
            }
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/room", self.addr)
    }

    /// Poll `/api/room` until it lists `expected` participants
    pub async fn wait_for_participants(&self, expected: usize) -> serde_json::Value {
        let client = reqwest::Client::new();
        let url = format!("{}/api/room", self.base_url());

        tokio::time::timeout(WAIT, async {
            loop {
                let body: serde_json::Value = client
                    .get(&url)
                    .send()
                    .await
                    .expect("Failed to send request")
                    .json()
                    .await
                    .expect("Failed to parse JSON");
                if body["participants"].as_array().map(Vec::len) == Some(expected) {
                    return body;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .expect("room did not reach the expected participant count")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
