//! Registration and login handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /auth/register`
///
/// Creates a user account and returns a token so the client can connect
/// immediately without a separate login round-trip.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let token = state
        .auth_service
        .register(&req.username, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "User registered successfully".to_string(),
            token,
        }),
    ))
}

/// `POST /auth/login`
///
/// Verifies credentials and returns a fresh token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth_service
        .login(&req.username, &req.password)
        .await?;

    Ok(Json(TokenResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
