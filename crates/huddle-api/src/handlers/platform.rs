//! Team platform OAuth and sync handlers.
//!
//! The authorization-code + PKCE flow runs fully server-side. The
//! client opens the authorize URL, the provider redirects back with a
//! code, and the client posts the code here; the verifier and client
//! secret never leave the server.

use axum::Json;
use axum::extract::State;
use uuid::Uuid;

use huddle_connect::PkcePair;
use huddle_core::error::AppError;
use huddle_service::schedule::sync::SyncSummary;

use crate::dto::request::PlatformCallbackRequest;
use crate::dto::response::{ApiResponse, AuthorizeUrlResponse};
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::{AppState, PendingVerifier, sweep_expired_verifiers};

/// POST /api/platform/connect
pub async fn connect(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<ApiResponse<AuthorizeUrlResponse>>, ApiError> {
    if !state.config.platform.enabled {
        return Err(AppError::configuration("Platform sync is disabled").into());
    }

    sweep_expired_verifiers(&state.pkce_verifiers, chrono::Utc::now());

    let oauth_state = Uuid::new_v4().to_string();
    let pkce = PkcePair::generate();
    let url = state.oauth.authorize_url(&oauth_state, &pkce)?;
    state
        .pkce_verifiers
        .insert(oauth_state.clone(), PendingVerifier::new(pkce.verifier));

    Ok(Json(ApiResponse::ok(AuthorizeUrlResponse {
        url,
        state: oauth_state,
    })))
}

/// POST /api/platform/callback
///
/// Exchanges the provider code and runs a full account sync.
pub async fn callback(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<PlatformCallbackRequest>,
) -> Result<Json<ApiResponse<SyncSummary>>, ApiError> {
    validate(&request)?;
    let (_, pending) = state
        .pkce_verifiers
        .remove(&request.state)
        .ok_or_else(|| AppError::oauth("Unknown or expired OAuth state"))?;
    if pending.is_expired(chrono::Utc::now()) {
        return Err(AppError::oauth("Unknown or expired OAuth state").into());
    }

    let tokens = state
        .oauth
        .exchange_code(&request.code, &pending.verifier)
        .await?;
    let summary = state
        .sync
        .sync_account(auth.user_id, &tokens.access_token)
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}
