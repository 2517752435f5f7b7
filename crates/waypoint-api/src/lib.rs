//! # waypoint-api
//!
//! The HTTP and WebSocket surface of the Waypoint presence relay: route
//! definitions, shared application state, request/response DTOs, and the
//! server bootstrap.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::run_server;
pub use state::AppState;
