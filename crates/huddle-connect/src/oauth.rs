//! Server-side OAuth authorization-code flow with PKCE.
//!
//! The client secret never leaves the server. Mobile clients receive
//! only the authorization URL and hand back the provider's code; the
//! exchange and refresh happen here.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use huddle_core::config::platform::PlatformConfig;
use huddle_core::error::{AppError, ErrorKind};
use huddle_core::result::AppResult;

use crate::http::{status_error, transport_error};

/// A PKCE verifier/challenge pair (S256).
#[derive(Debug, Clone)]
pub struct PkcePair {
    /// The secret verifier, held server-side until the code exchange.
    pub verifier: String,
    /// The derived challenge embedded in the authorization URL.
    pub challenge: String,
}

impl PkcePair {
    /// Generate a fresh pair from 32 random bytes.
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::rng().random();
        let verifier = URL_SAFE_NO_PAD.encode(bytes);
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }
}

/// Tokens returned by the provider's token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    /// Bearer token for API pulls.
    pub access_token: String,
    /// Refresh token, when the provider grants one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// OAuth client for the team platform.
pub struct OAuthClient {
    client: reqwest::Client,
    config: PlatformConfig,
}

impl OAuthClient {
    /// Build a client from configuration.
    pub fn new(config: &PlatformConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "OAuth client", e))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the authorization URL for the client to open.
    ///
    /// The URL carries the challenge, never the verifier or secret.
    pub fn authorize_url(&self, state: &str, pkce: &PkcePair) -> AppResult<String> {
        let mut url = reqwest::Url::parse(&self.config.authorize_url)
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Authorize URL", e))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("state", state)
            .append_pair("code_challenge", &pkce.challenge)
            .append_pair("code_challenge_method", "S256");
        Ok(url.into())
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> AppResult<TokenSet> {
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.config.redirect_uri),
            ("code_verifier", verifier),
        ])
        .await
    }

    /// Obtain a fresh access token from a refresh token.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenSet> {
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> AppResult<TokenSet> {
        let mut form: Vec<(&str, &str)> = vec![
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ];
        form.extend_from_slice(params);

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error("oauth.token", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error("oauth.token", ErrorKind::OAuth, status));
        }
        response
            .json::<TokenSet>()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::OAuth, "Malformed token response", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlatformConfig {
        PlatformConfig {
            enabled: true,
            client_id: "huddle-client".to_string(),
            client_secret: "s3cret".to_string(),
            authorize_url: "https://platform.example.com/oauth/authorize".to_string(),
            token_url: "https://platform.example.com/oauth/token".to_string(),
            api_base_url: "https://api.platform.example.com".to_string(),
            redirect_uri: "https://huddle.example.com/oauth/callback".to_string(),
            timeout_seconds: 15,
        }
    }

    #[test]
    fn test_pkce_challenge_is_s256_of_verifier() {
        let pair = PkcePair::generate();
        let expected = URL_SAFE_NO_PAD.encode(Sha256::digest(pair.verifier.as_bytes()));
        assert_eq!(pair.challenge, expected);
        // base64url of 32 bytes without padding
        assert_eq!(pair.verifier.len(), 43);
    }

    #[test]
    fn test_pkce_pairs_are_unique() {
        assert_ne!(PkcePair::generate().verifier, PkcePair::generate().verifier);
    }

    #[test]
    fn test_authorize_url_carries_challenge_not_secret() {
        let client = OAuthClient::new(&config()).unwrap();
        let pkce = PkcePair::generate();

        let url = client.authorize_url("state-1", &pkce).unwrap();

        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains(&pkce.challenge));
        assert!(url.contains("client_id=huddle-client"));
        assert!(!url.contains("s3cret"));
        assert!(!url.contains(&pkce.verifier));
    }
}
