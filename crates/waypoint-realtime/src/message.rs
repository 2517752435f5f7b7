//! JSON wire frames exchanged over the WebSocket.
//!
//! All frames carry a `"type"` discriminator. Client frames with an
//! unrecognized type decode to [`ClientFrame::Unknown`] so future message
//! kinds pass through without killing the session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waypoint_entity::location::PlayerLocation;

/// A frame received from a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// The client's player moved to a new position.
    Move {
        /// World X coordinate.
        x: f64,
        /// World Y coordinate.
        y: f64,
        /// World Z coordinate.
        z: f64,
    },
    /// Any other frame type. Decoded and ignored.
    #[serde(other)]
    Unknown,
}

/// A confirmed location update broadcast to every session.
///
/// Always built from persisted values, never from raw client input: the
/// coordinates and timestamp are what the store returned from `save`.
/// The timestamp serializes as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLocationUpdate {
    /// Frame discriminator, always `"player_location_update"`.
    #[serde(rename = "type")]
    pub frame_type: String,
    /// The player that moved.
    pub player_id: Uuid,
    /// The player's username.
    pub username: String,
    /// World X coordinate.
    pub x: f64,
    /// World Y coordinate.
    pub y: f64,
    /// World Z coordinate.
    pub z: f64,
    /// Server-assigned time of the update.
    pub timestamp: DateTime<Utc>,
}

impl PlayerLocationUpdate {
    /// Build an update frame from a persisted location record.
    pub fn from_location(location: &PlayerLocation, username: &str) -> Self {
        Self {
            frame_type: "player_location_update".to_string(),
            player_id: location.player_id,
            username: username.to_string(),
            x: location.x,
            y: location.y,
            z: location.z,
            timestamp: location.updated_at,
        }
    }
}

/// One-shot snapshot of every known player position, sent right after
/// admission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    /// Frame discriminator, always `"initial_state"`.
    #[serde(rename = "type")]
    pub frame_type: String,
    /// The latest known position of every player.
    pub locations: Vec<PlayerLocationUpdate>,
}

impl InitialState {
    /// Build the snapshot frame from the persisted location set.
    ///
    /// Usernames are not resolved for snapshot entries; clients key on
    /// `player_id` and receive real usernames with every live update.
    pub fn from_locations(locations: &[PlayerLocation]) -> Self {
        Self {
            frame_type: "initial_state".to_string(),
            locations: locations
                .iter()
                .map(|loc| PlayerLocationUpdate::from_location(loc, "unknown"))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_move_frame() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"move","x":1.5,"y":-2.0,"z":0.25}"#).unwrap();
        assert_eq!(
            frame,
            ClientFrame::Move {
                x: 1.5,
                y: -2.0,
                z: 0.25
            }
        );
    }

    #[test]
    fn test_unknown_frame_type_is_accepted() {
        let frame: ClientFrame =
            serde_json::from_str(r#"{"type":"teleport","x":1.0}"#).unwrap();
        assert_eq!(frame, ClientFrame::Unknown);
    }

    #[test]
    fn test_garbage_does_not_decode() {
        assert!(serde_json::from_str::<ClientFrame>("not json").is_err());
        assert!(serde_json::from_str::<ClientFrame>(r#"{"x":1.0}"#).is_err());
    }

    #[test]
    fn test_update_frame_shape() {
        let loc = PlayerLocation {
            player_id: Uuid::new_v4(),
            x: 1.0,
            y: 2.0,
            z: 3.0,
            updated_at: Utc::now(),
        };
        let update = PlayerLocationUpdate::from_location(&loc, "alice");
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&update).unwrap()).unwrap();

        assert_eq!(json["type"], "player_location_update");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["x"], 1.0);
        // RFC 3339 timestamps parse back losslessly
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_initial_state_shape() {
        let loc = PlayerLocation {
            player_id: Uuid::new_v4(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            updated_at: Utc::now(),
        };
        let snapshot = InitialState::from_locations(std::slice::from_ref(&loc));
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&snapshot).unwrap()).unwrap();

        assert_eq!(json["type"], "initial_state");
        assert_eq!(json["locations"].as_array().unwrap().len(), 1);
        assert_eq!(json["locations"][0]["type"], "player_location_update");
        assert_eq!(json["locations"][0]["username"], "unknown");
    }
}
