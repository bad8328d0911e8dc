//! Friend request and friendship handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use huddle_entity::friendship::{FriendRequest, Friendship};

use crate::dto::request::SendFriendRequestRequest;
use crate::dto::response::{AffectedResponse, ApiResponse};
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/friends/requests
pub async fn send_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<SendFriendRequestRequest>,
) -> Result<Json<ApiResponse<FriendRequest>>, ApiError> {
    validate(&request)?;
    let created = state
        .friends
        .send_request(auth.user_id, request.requested_id, request.role)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

/// GET /api/friends/requests
pub async fn pending_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<FriendRequest>>>, ApiError> {
    let pending = state.friends.pending_requests(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(pending)))
}

/// PUT /api/friends/requests/{id}/accept
pub async fn accept(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<(Friendship, Friendship)>>, ApiError> {
    let edges = state.friends.accept(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(edges)))
}

/// PUT /api/friends/requests/{id}/decline
pub async fn decline(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.friends.decline(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "message": "Declined" }),
    )))
}

/// GET /api/friends
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Friendship>>>, ApiError> {
    let friends = state.friends.list_friends(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(friends)))
}

/// DELETE /api/friends/{id}
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(friend_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    let affected = state.friends.remove_friend(auth.user_id, friend_id).await?;
    Ok(Json(ApiResponse::ok(AffectedResponse { affected })))
}
