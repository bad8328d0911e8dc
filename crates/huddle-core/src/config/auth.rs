//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
///
/// Tokens are minted by the identity provider sharing `jwt_secret`;
/// Huddle only validates them and extracts the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for JWT validation.
    pub jwt_secret: String,
    /// Access token lifetime in minutes (used when minting test tokens).
    #[serde(default = "default_token_lifetime")]
    pub token_lifetime_minutes: i64,
}

fn default_token_lifetime() -> i64 {
    60
}
