//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use waypoint_auth::jwt::{JwtDecoder, JwtEncoder};
use waypoint_core::config::AppConfig;
use waypoint_realtime::Relay;
use waypoint_service::{AuthService, PlayerService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// JWT token encoder.
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Registration/login service.
    pub auth_service: Arc<AuthService>,
    /// Player position service.
    pub player_service: Arc<PlayerService>,
    /// The session hub and broadcast relay.
    pub relay: Relay,
}
