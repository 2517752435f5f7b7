//! Player location entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The latest known position of a player in the world.
///
/// One logical record per player, last-write-wins: every `move` frame
/// overwrites the previous coordinates, and `updated_at` is assigned by
/// the database on each write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PlayerLocation {
    /// The player this position belongs to.
    pub player_id: Uuid,
    /// World X coordinate.
    pub x: f64,
    /// World Y coordinate.
    pub y: f64,
    /// World Z coordinate.
    pub z: f64,
    /// Server-assigned time of the last update.
    pub updated_at: DateTime<Utc>,
}
