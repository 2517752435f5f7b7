//! Request and response DTOs for the HTTP API.

use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Desired login name.
    pub username: String,
    /// Plaintext password (hashed server-side).
    pub password: String,
}

/// Request body for user login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Response body carrying an issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Human-readable status message.
    pub message: String,
    /// Signed JWT for the WebSocket admission gate.
    pub token: String,
}

/// Response body for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is up.
    pub status: String,
    /// Number of currently connected WebSocket sessions.
    pub connected_clients: usize,
}
