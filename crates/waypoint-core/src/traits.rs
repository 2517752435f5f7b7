//! Collaborator traits consumed by the real-time core.

use async_trait::async_trait;
use uuid::Uuid;

use waypoint_entity::location::PlayerLocation;

use crate::result::AppResult;

/// Durable store for the latest known position per player.
///
/// The real-time core only ever needs these two operations: persist a
/// position and get back the authoritative record (including the
/// server-assigned timestamp), and load the full current position set for
/// the initial-state snapshot. The production implementation is backed by
/// PostgreSQL; tests use an in-memory map.
#[async_trait]
pub trait LocationStore: Send + Sync + 'static {
    /// Persist a player's position, last-write-wins. Returns the stored
    /// record carrying the authoritative `updated_at` timestamp.
    async fn save(&self, player_id: Uuid, x: f64, y: f64, z: f64) -> AppResult<PlayerLocation>;

    /// Load the latest known position of every player.
    async fn load_all(&self) -> AppResult<Vec<PlayerLocation>>;
}
