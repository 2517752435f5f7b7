//! # waypoint-realtime
//!
//! The session hub and broadcast fan-out pipeline. Provides:
//!
//! - [`hub::HubHandle`] — handle to a single actor task that owns the
//!   registry of live sessions and performs non-blocking broadcast fan-out
//! - [`session::Session`] — per-connection identity
//! - [`message`] — the JSON wire frames exchanged with clients
//! - [`relay::Relay`] — the facade the WebSocket handler drives: admission
//!   with initial-state snapshot, inbound frame handling, disconnect
//!
//! The transport itself (socket reads/writes, keepalive pings) lives in the
//! API crate; everything here is socket-agnostic and tested with plain
//! channels.

pub mod hub;
pub mod message;
pub mod relay;
pub mod session;

pub use hub::HubHandle;
pub use relay::Relay;
pub use session::{Session, SessionId};
