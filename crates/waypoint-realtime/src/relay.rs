//! Relay facade: admission, inbound frame handling, disconnect.
//!
//! The WebSocket handler drives exactly three operations here. Everything
//! that touches shared state goes through the hub; everything else
//! (decoding, persistence) is local to the calling pump task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use waypoint_core::config::realtime::RealtimeConfig;
use waypoint_core::traits::LocationStore;

use crate::hub::HubHandle;
use crate::message::{ClientFrame, InitialState, PlayerLocationUpdate};
use crate::session::Session;

/// Coordinates sessions, the hub, and the location store.
#[derive(Clone)]
pub struct Relay {
    hub: HubHandle,
    store: Arc<dyn LocationStore>,
    config: RealtimeConfig,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay").field("config", &self.config).finish()
    }
}

impl Relay {
    /// Create the relay and spawn its hub task.
    pub fn new(config: RealtimeConfig, store: Arc<dyn LocationStore>) -> Self {
        Self {
            hub: HubHandle::spawn(),
            store,
            config,
        }
    }

    /// Timing and size limits for the pumps.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Admit an authenticated connection.
    ///
    /// Creates the session and its bounded outbox, registers with the hub,
    /// then enqueues a one-shot initial-state snapshot. The snapshot is
    /// best-effort: a store failure is logged and admission proceeds.
    /// Returns the session and the consumer side of its outbox for the
    /// outbound pump.
    pub async fn admit(
        &self,
        user_id: uuid::Uuid,
        username: &str,
    ) -> (Session, mpsc::Receiver<String>) {
        let session = Session::new(user_id, username);
        let (outbox_tx, outbox_rx) = mpsc::channel(self.config.outbox_capacity);

        self.hub.register(session.clone(), outbox_tx.clone());

        match self.store.load_all().await {
            Ok(locations) => {
                let snapshot = InitialState::from_locations(&locations);
                match serde_json::to_string(&snapshot) {
                    Ok(json) => {
                        if outbox_tx.try_send(json).is_err() {
                            warn!(
                                session_id = %session.id,
                                "Could not enqueue initial state snapshot"
                            );
                        }
                    }
                    Err(e) => error!(error = %e, "Failed to encode initial state snapshot"),
                }
            }
            Err(e) => {
                warn!(
                    session_id = %session.id,
                    error = %e,
                    "Failed to load initial state, admitting without snapshot"
                );
            }
        }

        (session, outbox_rx)
    }

    /// Process one raw text frame from a client.
    ///
    /// All failures here are transient and per-frame: the offending update
    /// is dropped and the session continues.
    pub async fn handle_frame(&self, session: &Session, raw: &str) {
        if raw.len() > self.config.max_frame_bytes {
            warn!(
                session_id = %session.id,
                size = raw.len(),
                limit = self.config.max_frame_bytes,
                "Discarding oversized frame"
            );
            return;
        }

        let frame: ClientFrame = match serde_json::from_str(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(
                    session_id = %session.id,
                    username = %session.username,
                    error = %e,
                    "Discarding malformed frame"
                );
                return;
            }
        };

        match frame {
            ClientFrame::Move { x, y, z } => {
                // Persist first; the broadcast carries the stored values and
                // the authoritative timestamp, never raw client input.
                let location = match self.store.save(session.user_id, x, y, z).await {
                    Ok(location) => location,
                    Err(e) => {
                        error!(
                            session_id = %session.id,
                            username = %session.username,
                            error = %e,
                            "Failed to persist location update, dropping"
                        );
                        return;
                    }
                };

                let update = PlayerLocationUpdate::from_location(&location, &session.username);
                match serde_json::to_string(&update) {
                    Ok(json) => self.hub.broadcast(json),
                    Err(e) => error!(error = %e, "Failed to encode location update"),
                }
            }
            ClientFrame::Unknown => {
                debug!(
                    session_id = %session.id,
                    username = %session.username,
                    "Ignoring frame with unknown type"
                );
            }
        }
    }

    /// Remove the session from the hub. Called unconditionally from pump
    /// cleanup paths; calling it twice for the same session is harmless.
    pub fn disconnect(&self, session: &Session) {
        self.hub.unregister(session.id);
    }

    /// Number of currently registered sessions.
    pub async fn session_count(&self) -> usize {
        self.hub.session_count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use waypoint_core::error::AppError;
    use waypoint_core::result::AppResult;
    use waypoint_entity::location::PlayerLocation;

    /// In-memory last-write-wins store.
    #[derive(Default)]
    struct MemoryStore {
        locations: Mutex<HashMap<Uuid, PlayerLocation>>,
        fail_saves: AtomicBool,
    }

    #[async_trait]
    impl LocationStore for MemoryStore {
        async fn save(
            &self,
            player_id: Uuid,
            x: f64,
            y: f64,
            z: f64,
        ) -> AppResult<PlayerLocation> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(AppError::database("save failed"));
            }
            let location = PlayerLocation {
                player_id,
                x,
                y,
                z,
                updated_at: Utc::now(),
            };
            self.locations
                .lock()
                .await
                .insert(player_id, location.clone());
            Ok(location)
        }

        async fn load_all(&self) -> AppResult<Vec<PlayerLocation>> {
            Ok(self.locations.lock().await.values().cloned().collect())
        }
    }

    fn relay_with_store() -> (Relay, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let relay = Relay::new(RealtimeConfig::default(), store.clone());
        (relay, store)
    }

    fn parse(frame: &str) -> serde_json::Value {
        serde_json::from_str(frame).unwrap()
    }

    #[tokio::test]
    async fn test_admit_delivers_one_snapshot() {
        let (relay, store) = relay_with_store();
        store.save(Uuid::new_v4(), 1.0, 2.0, 3.0).await.unwrap();

        let (_session, mut outbox) = relay.admit(Uuid::new_v4(), "alice").await;

        let snapshot = parse(&outbox.recv().await.unwrap());
        assert_eq!(snapshot["type"], "initial_state");
        assert_eq!(snapshot["locations"].as_array().unwrap().len(), 1);

        // Exactly one snapshot, nothing else queued.
        assert!(outbox.try_recv().is_err());
        assert_eq!(relay.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_move_fans_out_to_all_sessions_including_sender() {
        let (relay, _store) = relay_with_store();

        let (a, mut rx_a) = relay.admit(Uuid::new_v4(), "a").await;
        let (_b, mut rx_b) = relay.admit(Uuid::new_v4(), "b").await;
        let (_c, mut rx_c) = relay.admit(Uuid::new_v4(), "c").await;

        // Drain the admission snapshots.
        for rx in [&mut rx_a, &mut rx_b, &mut rx_c] {
            rx.recv().await.unwrap();
        }

        relay
            .handle_frame(&a, r#"{"type":"move","x":10.0,"y":20.0,"z":30.0}"#)
            .await;

        let frames: Vec<serde_json::Value> = [
            rx_a.recv().await.unwrap(),
            rx_b.recv().await.unwrap(),
            rx_c.recv().await.unwrap(),
        ]
        .iter()
        .map(|f| parse(f))
        .collect();

        for frame in &frames {
            assert_eq!(frame["type"], "player_location_update");
            assert_eq!(frame["username"], "a");
            assert_eq!(frame["x"], 10.0);
        }
        // Identical payload everywhere, echo included.
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[1], frames[2]);
    }

    #[tokio::test]
    async fn test_malformed_frame_then_valid_move() {
        let (relay, _store) = relay_with_store();

        let (a, mut rx) = relay.admit(Uuid::new_v4(), "a").await;
        rx.recv().await.unwrap(); // snapshot

        relay.handle_frame(&a, "{{{ not json").await;
        relay
            .handle_frame(&a, r#"{"type":"move","x":1.0,"y":1.0,"z":1.0}"#)
            .await;

        // The malformed frame was dropped; the move went through.
        let frame = parse(&rx.recv().await.unwrap());
        assert_eq!(frame["type"], "player_location_update");
        assert_eq!(relay.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_oversized_frame_is_discarded() {
        let (relay, store) = relay_with_store();

        let (a, mut rx) = relay.admit(Uuid::new_v4(), "a").await;
        rx.recv().await.unwrap(); // snapshot

        let padding = "x".repeat(600);
        let oversized = format!(r#"{{"type":"move","x":1.0,"y":1.0,"z":1.0,"pad":"{padding}"}}"#);
        relay.handle_frame(&a, &oversized).await;

        assert!(store.load_all().await.unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unknown_frame_type_is_ignored() {
        let (relay, store) = relay_with_store();

        let (a, mut rx) = relay.admit(Uuid::new_v4(), "a").await;
        rx.recv().await.unwrap(); // snapshot

        relay.handle_frame(&a, r#"{"type":"chat"}"#).await;

        assert!(store.load_all().await.unwrap().is_empty());
        assert!(rx.try_recv().is_err());
        assert_eq!(relay.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_failure_drops_update_but_keeps_session() {
        let (relay, store) = relay_with_store();

        let (a, mut rx) = relay.admit(Uuid::new_v4(), "a").await;
        rx.recv().await.unwrap(); // snapshot

        store.fail_saves.store(true, Ordering::SeqCst);
        relay
            .handle_frame(&a, r#"{"type":"move","x":1.0,"y":1.0,"z":1.0}"#)
            .await;

        // Nothing broadcast, session still live.
        assert!(rx.try_recv().is_err());
        assert_eq!(relay.session_count().await, 1);

        // The next update supersedes the dropped one.
        store.fail_saves.store(false, Ordering::SeqCst);
        relay
            .handle_frame(&a, r#"{"type":"move","x":2.0,"y":2.0,"z":2.0}"#)
            .await;
        let frame = parse(&rx.recv().await.unwrap());
        assert_eq!(frame["x"], 2.0);
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let (relay, store) = relay_with_store();

        let user_id = Uuid::new_v4();
        let (a, mut rx) = relay.admit(user_id, "a").await;
        rx.recv().await.unwrap(); // snapshot

        relay
            .handle_frame(&a, r#"{"type":"move","x":1.0,"y":1.0,"z":1.0}"#)
            .await;
        relay
            .handle_frame(&a, r#"{"type":"move","x":9.0,"y":9.0,"z":9.0}"#)
            .await;

        // Storage reflects only the later write.
        let all = store.load_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].x, 9.0);

        // The most recent broadcast carries the later coordinates.
        let first = parse(&rx.recv().await.unwrap());
        let second = parse(&rx.recv().await.unwrap());
        assert_eq!(first["x"], 1.0);
        assert_eq!(second["x"], 9.0);
    }

    #[tokio::test]
    async fn test_load_all_failure_still_admits() {
        struct FailingStore;

        #[async_trait]
        impl LocationStore for FailingStore {
            async fn save(&self, _: Uuid, _: f64, _: f64, _: f64) -> AppResult<PlayerLocation> {
                Err(AppError::database("down"))
            }
            async fn load_all(&self) -> AppResult<Vec<PlayerLocation>> {
                Err(AppError::database("down"))
            }
        }

        let relay = Relay::new(RealtimeConfig::default(), Arc::new(FailingStore));
        let (_session, mut rx) = relay.admit(Uuid::new_v4(), "a").await;

        // No snapshot, but the session is registered and serviceable.
        assert!(rx.try_recv().is_err());
        assert_eq!(relay.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_harmless() {
        let (relay, _store) = relay_with_store();

        let (a, mut rx) = relay.admit(Uuid::new_v4(), "a").await;
        rx.recv().await.unwrap(); // snapshot

        relay.disconnect(&a);
        relay.disconnect(&a);

        assert_eq!(relay.session_count().await, 0);
        // Registry entry dropped the outbox sender: end-of-stream.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_disconnected_session_receives_no_broadcasts() {
        let (relay, _store) = relay_with_store();

        let (a, mut rx_a) = relay.admit(Uuid::new_v4(), "a").await;
        let (b, mut rx_b) = relay.admit(Uuid::new_v4(), "b").await;
        rx_a.recv().await.unwrap();
        rx_b.recv().await.unwrap();

        relay.disconnect(&b);
        relay
            .handle_frame(&a, r#"{"type":"move","x":5.0,"y":5.0,"z":5.0}"#)
            .await;

        assert_eq!(parse(&rx_a.recv().await.unwrap())["x"], 5.0);
        // b's outbox closed without ever seeing the update.
        assert_eq!(rx_b.recv().await, None);
    }
}
