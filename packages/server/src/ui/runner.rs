//! Server bootstrap: room startup, routing and the accept loop.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{config::ServerConfig, error::ServerError, usecase::Room};

use super::{
    handler::{get_room_state, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Bind the configured address and serve until Ctrl+C / SIGTERM.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    serve(listener, config, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
///
/// Starts the room event loop; the room lives as long as the server.
pub async fn serve<F>(
    listener: TcpListener,
    config: ServerConfig,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let room = Room::spawn(config.forward_capacity);
    let state = Arc::new(AppState::new(room, config.outbound_capacity));
    let app = create_router(state);

    tracing::info!("Application starting on {}", listener.local_addr()?);
    tracing::info!(
        outbound_capacity = config.outbound_capacity,
        forward_capacity = config.forward_capacity,
        "Room configured"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Build the router: the WebSocket room endpoint plus the HTTP API.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/room", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/room", get(get_room_state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
