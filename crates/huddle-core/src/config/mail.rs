//! Outbound transactional mail configuration.

use serde::{Deserialize, Serialize};

/// Transactional mail provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Whether outbound mail is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Provider HTTP endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Provider API key.
    #[serde(default)]
    pub api_key: String,
    /// From address for all outbound mail.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_from() -> String {
    "Huddle <no-reply@huddle.app>".to_string()
}

fn default_timeout() -> u64 {
    10
}
