//! Account registration and login.

use std::sync::Arc;

use tracing::info;

use waypoint_auth::jwt::JwtEncoder;
use waypoint_auth::password::PasswordHasher;
use waypoint_core::error::AppError;
use waypoint_core::result::AppResult;
use waypoint_database::repositories::UserRepository;

/// Handles user registration and credential checks, issuing JWTs on success.
#[derive(Debug, Clone)]
pub struct AuthService {
    users: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    encoder: Arc<JwtEncoder>,
    password_min_length: usize,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(
        users: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        password_min_length: usize,
    ) -> Self {
        Self {
            users,
            hasher,
            encoder,
            password_min_length,
        }
    }

    /// Register a new user and return a signed token for them.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<String> {
        if username.len() < 3 || username.len() > 20 {
            return Err(AppError::validation(
                "Username must be between 3 and 20 characters",
            ));
        }
        if password.len() < self.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.password_min_length
            )));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let user = self.users.create(username, &password_hash).await?;
        let token = self.encoder.generate(user.id, &user.username)?;

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(token)
    }

    /// Authenticate a user and return a signed token.
    ///
    /// Unknown usernames and wrong passwords produce the same error so the
    /// response does not leak which accounts exist.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<String> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        if !self.hasher.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        let token = self.encoder.generate(user.id, &user.username)?;

        info!(user_id = %user.id, username = %user.username, "User logged in");
        Ok(token)
    }
}
