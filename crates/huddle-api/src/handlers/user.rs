//! User profile handlers.

use axum::Json;
use axum::extract::State;

use huddle_core::error::AppError;
use huddle_entity::user::{UpsertUser, User};

use crate::dto::request::UpdateProfileRequest;
use crate::dto::response::ApiResponse;
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .users
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Profile not found"))?;
    Ok(Json(ApiResponse::ok(user)))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    validate(&request)?;
    let user = state
        .users
        .upsert(&UpsertUser {
            id: auth.user_id,
            email: request.email,
            display_name: request.display_name,
            photo_url: request.photo_url,
        })
        .await?;
    Ok(Json(ApiResponse::ok(user)))
}
