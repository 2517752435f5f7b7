//! # waypoint-auth
//!
//! Credential handling for Waypoint: HS256 JWT issuance and validation,
//! plus Argon2id password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
