//! Push gateway configuration.

use serde::{Deserialize, Serialize};

/// Push notification gateway settings (FCM HTTP v1 style endpoint).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether push delivery is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Gateway HTTP endpoint.
    #[serde(default)]
    pub endpoint: String,
    /// Gateway API key / service account token.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Retry attempts for transient gateway failures.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Base retry delay in milliseconds.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    10
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_base_delay() -> u64 {
    200
}
