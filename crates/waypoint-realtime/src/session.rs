//! Per-connection session identity.

use uuid::Uuid;

/// Unique identifier for one live connection.
///
/// Distinct from the user ID: the same user connecting twice produces two
/// sessions, each registered and shed independently.
pub type SessionId = Uuid;

/// Server-side identity of one connected, authenticated client.
///
/// The session's outbound queue is not stored here: the hub's registry
/// entry owns the producer side and the outbound pump owns the consumer
/// side, so neither half ever appears outside its owner.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique connection ID.
    pub id: SessionId,
    /// The authenticated user behind this connection.
    pub user_id: Uuid,
    /// Username, carried on every location update this session produces.
    pub username: String,
}

impl Session {
    /// Create a session for a freshly authenticated connection.
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            username: username.into(),
        }
    }
}
