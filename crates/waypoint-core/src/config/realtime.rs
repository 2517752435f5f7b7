//! Real-time WebSocket engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-session outbound queue capacity in frames. A session whose
    /// outbox is full when a broadcast arrives is disconnected.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
    /// Maximum accepted client frame size in bytes.
    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,
    /// Idle read deadline in seconds; refreshed on every received frame.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,
    /// WebSocket keepalive ping interval in seconds.
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
}

impl RealtimeConfig {
    /// Read deadline as a [`Duration`].
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    /// Ping interval as a [`Duration`].
    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_seconds)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbox_capacity: default_outbox_capacity(),
            max_frame_bytes: default_max_frame_bytes(),
            read_timeout_seconds: default_read_timeout(),
            ping_interval_seconds: default_ping_interval(),
        }
    }
}

fn default_outbox_capacity() -> usize {
    256
}

fn default_max_frame_bytes() -> usize {
    512
}

fn default_read_timeout() -> u64 {
    60
}

fn default_ping_interval() -> u64 {
    50
}
