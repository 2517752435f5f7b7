//! # waypoint-service
//!
//! Business services sitting between the HTTP/WebSocket surface and the
//! repositories: account registration/login and player position handling.

pub mod auth;
pub mod player;

pub use auth::AuthService;
pub use player::PlayerService;
