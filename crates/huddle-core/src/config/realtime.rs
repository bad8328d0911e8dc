//! Real-time change-feed configuration.

use serde::{Deserialize, Serialize};

/// Real-time WebSocket change-feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum channels a single connection may subscribe to.
    #[serde(default = "default_max_subscriptions")]
    pub max_subscriptions_per_connection: usize,
    /// Suppression window for duplicate notification events, in ms.
    #[serde(default = "default_dedup_window")]
    pub dedup_window_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_subscriptions_per_connection: default_max_subscriptions(),
            dedup_window_ms: default_dedup_window(),
        }
    }
}

fn default_max_subscriptions() -> usize {
    32
}

fn default_dedup_window() -> u64 {
    2000
}
