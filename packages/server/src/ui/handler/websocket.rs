//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    domain::UserName,
    infrastructure::transport::split_websocket,
    ui::{identity::resolve_user_name, state::AppState},
    usecase::ServeConnectionUseCase,
};

/// Upgrade the request and join the room.
///
/// The display name comes from the `auth` cookie; without one the client
/// participates anonymously.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> impl IntoResponse {
    let name = resolve_user_name(&jar);
    let usecase = ServeConnectionUseCase::new(state.room.clone(), state.outbound_capacity);

    ws.on_failed_upgrade(|e| tracing::error!("WebSocket upgrade failed: {}", e))
        .on_upgrade(move |socket| handle_socket(socket, usecase, name))
}

async fn handle_socket(socket: WebSocket, usecase: ServeConnectionUseCase, name: Option<UserName>) {
    let (reader, writer) = split_websocket(socket);

    if let Err(e) = usecase.execute(reader, writer, name).await {
        tracing::error!("Failed to serve connection: {}", e);
    }
}
