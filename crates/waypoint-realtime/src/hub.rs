//! The hub: single serialized authority over live sessions and broadcast
//! fan-out.
//!
//! The hub runs as one actor task consuming a queue of control events.
//! Nothing outside [`Hub::run`] ever touches the registry, so no locking is
//! needed: registration, removal, and fan-out are all serialized through
//! the event channel. Broadcasts use a non-blocking enqueue per session;
//! a session whose outbox is full is shed in the same pass, so one stalled
//! client can never delay delivery to the rest.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::session::{Session, SessionId};

/// Control events processed by the hub task.
enum HubEvent {
    /// A freshly admitted session joins the registry.
    Register(SessionEntry),
    /// A session leaves the registry. No-op if already removed.
    Unregister(SessionId),
    /// Fan a frame out to every registered session.
    Broadcast(String),
    /// Report the current registry size.
    SessionCount(oneshot::Sender<usize>),
}

/// A registry entry: session identity plus the producer side of its outbox.
///
/// This is the only long-lived sender for the outbox. Removing the entry
/// drops it, which closes the channel and lets the session's outbound pump
/// observe end-of-stream.
struct SessionEntry {
    session: Session,
    outbox: mpsc::Sender<String>,
}

/// Cloneable handle for submitting control events to the hub task.
#[derive(Debug, Clone)]
pub struct HubHandle {
    events: mpsc::UnboundedSender<HubEvent>,
}

impl HubHandle {
    /// Spawn the hub actor task and return its handle.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(
            Hub {
                registry: HashMap::new(),
            }
            .run(rx),
        );
        Self { events: tx }
    }

    /// Register a session together with the producer side of its outbox.
    pub fn register(&self, session: Session, outbox: mpsc::Sender<String>) {
        let _ = self.events.send(HubEvent::Register(SessionEntry { session, outbox }));
    }

    /// Remove a session from the registry. Safe to call more than once;
    /// both pumps call this on their cleanup paths.
    pub fn unregister(&self, id: SessionId) {
        let _ = self.events.send(HubEvent::Unregister(id));
    }

    /// Fan an encoded frame out to every registered session.
    pub fn broadcast(&self, frame: String) {
        let _ = self.events.send(HubEvent::Broadcast(frame));
    }

    /// Current number of registered sessions.
    pub async fn session_count(&self) -> usize {
        let (tx, rx) = oneshot::channel();
        if self.events.send(HubEvent::SessionCount(tx)).is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

/// Registry state owned exclusively by the hub task.
struct Hub {
    registry: HashMap<SessionId, SessionEntry>,
}

impl Hub {
    /// Event loop. Runs until every [`HubHandle`] has been dropped.
    async fn run(mut self, mut events: mpsc::UnboundedReceiver<HubEvent>) {
        while let Some(event) = events.recv().await {
            match event {
                HubEvent::Register(entry) => {
                    info!(
                        session_id = %entry.session.id,
                        user_id = %entry.session.user_id,
                        username = %entry.session.username,
                        "Session registered"
                    );
                    self.registry.insert(entry.session.id, entry);
                }
                HubEvent::Unregister(id) => {
                    if let Some(entry) = self.registry.remove(&id) {
                        info!(
                            session_id = %id,
                            username = %entry.session.username,
                            "Session unregistered"
                        );
                    }
                }
                HubEvent::Broadcast(frame) => self.broadcast(&frame),
                HubEvent::SessionCount(reply) => {
                    let _ = reply.send(self.registry.len());
                }
            }
        }
        debug!("Hub event loop ended");
    }

    /// Non-blocking fan-out. A session whose outbox cannot accept the frame
    /// is shed: removed from the registry, which closes its outbox.
    fn broadcast(&mut self, frame: &str) {
        let mut shed: Vec<SessionId> = Vec::new();

        for (id, entry) in &self.registry {
            match entry.outbox.try_send(frame.to_owned()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        session_id = %id,
                        username = %entry.session.username,
                        "Outbox full, shedding slow session"
                    );
                    shed.push(*id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // Outbound pump already gone; drop the entry now rather
                    // than waiting for the unregister event.
                    shed.push(*id);
                }
            }
        }

        for id in shed {
            self.registry.remove(&id);
        }
    }
}
