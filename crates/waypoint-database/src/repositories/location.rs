//! Player location repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use waypoint_core::error::{AppError, ErrorKind};
use waypoint_core::result::AppResult;
use waypoint_entity::location::PlayerLocation;

/// Repository for the last-write-wins player position table.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Create a new location repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite a player's position.
    ///
    /// The database assigns `updated_at`; the returned row carries the
    /// authoritative timestamp for the broadcast.
    pub async fn upsert(&self, player_id: Uuid, x: f64, y: f64, z: f64) -> AppResult<PlayerLocation> {
        sqlx::query_as::<_, PlayerLocation>(
            "INSERT INTO player_locations (player_id, x, y, z) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (player_id) DO UPDATE \
             SET x = EXCLUDED.x, y = EXCLUDED.y, z = EXCLUDED.z, updated_at = NOW() \
             RETURNING player_id, x, y, z, updated_at",
        )
        .bind(player_id)
        .bind(x)
        .bind(y)
        .bind(z)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to save player location", e)
        })
    }

    /// Fetch the latest position of every player.
    pub async fn find_all(&self) -> AppResult<Vec<PlayerLocation>> {
        sqlx::query_as::<_, PlayerLocation>(
            "SELECT player_id, x, y, z, updated_at FROM player_locations",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load player locations", e)
        })
    }

    /// Fetch a single player's position, if known.
    pub async fn find_by_player(&self, player_id: Uuid) -> AppResult<Option<PlayerLocation>> {
        sqlx::query_as::<_, PlayerLocation>(
            "SELECT player_id, x, y, z, updated_at FROM player_locations WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load player location", e)
        })
    }
}
