//! Player position service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use waypoint_core::result::AppResult;
use waypoint_core::traits::LocationStore;
use waypoint_database::repositories::LocationRepository;
use waypoint_entity::location::PlayerLocation;

/// Persists and retrieves player positions.
///
/// This is the production [`LocationStore`] implementation the real-time
/// relay is wired with.
#[derive(Debug, Clone)]
pub struct PlayerService {
    locations: Arc<LocationRepository>,
}

impl PlayerService {
    /// Create a new player service.
    pub fn new(locations: Arc<LocationRepository>) -> Self {
        Self { locations }
    }

    /// Fetch a single player's position, if known.
    pub async fn location_of(&self, player_id: Uuid) -> AppResult<Option<PlayerLocation>> {
        self.locations.find_by_player(player_id).await
    }
}

#[async_trait]
impl LocationStore for PlayerService {
    async fn save(&self, player_id: Uuid, x: f64, y: f64, z: f64) -> AppResult<PlayerLocation> {
        let location = self.locations.upsert(player_id, x, y, z).await?;
        info!(player_id = %player_id, x, y, z, "Player moved");
        Ok(location)
    }

    async fn load_all(&self) -> AppResult<Vec<PlayerLocation>> {
        self.locations.find_all().await
    }
}
