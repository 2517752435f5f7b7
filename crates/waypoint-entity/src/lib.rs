//! # waypoint-entity
//!
//! Domain entity models shared across the Waypoint crates.

pub mod location;
pub mod user;

pub use location::PlayerLocation;
pub use user::User;
