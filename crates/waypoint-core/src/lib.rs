//! # waypoint-core
//!
//! Shared foundation for the Waypoint presence relay: configuration
//! schemas, the unified [`error::AppError`] type, and the collaborator
//! traits the real-time core depends on.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use config::AppConfig;
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use traits::LocationStore;
