//! `AuthUser` extractor: validates the bearer JWT and injects context.
//!
//! Tokens are minted by the identity provider sharing the HMAC secret;
//! Huddle validates the signature and expiry and trusts the subject.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use huddle_core::config::auth::AuthConfig;
use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims Huddle validates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Expiry as a Unix timestamp.
    pub exp: i64,
}

/// Extracted authenticated user context.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Decode and validate a bearer token against the shared secret.
pub fn decode_token(token: &str, config: &AuthConfig) -> AppResult<Claims> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    let data = jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map_err(|e| AppError::with_source(
            huddle_core::error::ErrorKind::Authentication,
            "Invalid or expired token",
            e,
        ))?;
    Ok(data.claims)
}

/// Mint a token for a user. Exists for tests and local development;
/// production tokens come from the identity provider.
pub fn issue_token(user_id: Uuid, config: &AuthConfig) -> AppResult<String> {
    let claims = Claims {
        sub: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::minutes(config.token_lifetime_minutes))
            .timestamp(),
    };
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key).map_err(|e| {
        AppError::with_source(
            huddle_core::error::ErrorKind::Internal,
            "Failed to mint token",
            e,
        )
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))
            .map_err(ApiError)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))
            .map_err(ApiError)?;

        let claims = decode_token(token, &state.config.auth).map_err(ApiError)?;
        Ok(AuthUser(RequestContext::new(claims.sub)))
    }
}
