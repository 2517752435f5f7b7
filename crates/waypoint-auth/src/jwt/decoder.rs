//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use waypoint_core::config::auth::AuthConfig;
use waypoint_core::error::AppError;

use super::claims::Claims;

/// Validates JWT tokens presented by clients.
///
/// This is the credential-service `validate` operation: a token string in,
/// `{user_id, username}` out, or an unauthorized error for every failure
/// mode (expired, malformed, bad signature).
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a token string.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::unauthorized("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::unauthorized("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::unauthorized("Invalid token signature")
                    }
                    _ => AppError::unauthorized(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use uuid::Uuid;
    use waypoint_core::error::ErrorKind;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_hours: 1,
            password_min_length: 6,
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let user_id = Uuid::new_v4();
        let token = encoder.generate(user_id, "alice").unwrap();
        let claims = decoder.decode(&token).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let decoder = JwtDecoder::new(&test_config());
        let err = decoder.decode("not-a-token").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let encoder = JwtEncoder::new(&test_config());
        let token = encoder.generate(Uuid::new_v4(), "bob").unwrap();

        let other = AuthConfig {
            jwt_secret: "different-secret".to_string(),
            ..test_config()
        };
        let decoder = JwtDecoder::new(&other);
        let err = decoder.decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }
}
