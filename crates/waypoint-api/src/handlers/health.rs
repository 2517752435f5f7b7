//! Liveness endpoint.

use axum::Json;
use axum::extract::State;

use crate::dto::HealthResponse;
use crate::state::AppState;

/// `GET /health`
///
/// Reports server liveness and the current WebSocket session count.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        connected_clients: state.relay.session_count().await,
    })
}
