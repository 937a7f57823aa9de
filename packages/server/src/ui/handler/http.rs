//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{infrastructure::dto::http::RoomStateDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current room state (members and creation time)
pub async fn get_room_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RoomStateDto>, StatusCode> {
    let snapshot = state.room.snapshot().await.map_err(|e| {
        tracing::error!("Failed to read room state: {}", e);
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    Ok(Json(RoomStateDto::from(&snapshot)))
}
