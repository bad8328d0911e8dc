//! Third-party team platform (OAuth) configuration.

use serde::{Deserialize, Serialize};

/// OAuth authorization-code + PKCE settings for the sports team platform.
///
/// The client secret lives here, server-side, and is never shipped to
/// clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Whether platform sync is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// OAuth client ID.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret (server-side only).
    #[serde(default)]
    pub client_secret: String,
    /// Authorization endpoint URL.
    #[serde(default)]
    pub authorize_url: String,
    /// Token endpoint URL.
    #[serde(default)]
    pub token_url: String,
    /// Platform API base URL for team/event pulls.
    #[serde(default)]
    pub api_base_url: String,
    /// Redirect URI registered with the provider.
    #[serde(default)]
    pub redirect_uri: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    15
}
