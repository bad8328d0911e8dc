//! Notification center handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use huddle_entity::notification::Notification;

use crate::dto::response::{AffectedResponse, ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Query parameters for notification listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Maximum rows to return.
    pub limit: Option<u32>,
}

/// GET /api/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<Notification>>>, ApiError> {
    let rows = state.notifications.list(&auth, params.limit).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.notifications.unread_count(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.notifications.mark_read(&auth, id).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "message": "Marked as read" }),
    )))
}

/// PUT /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    let affected = state.notifications.mark_all_read(&auth).await?;
    Ok(Json(ApiResponse::ok(AffectedResponse { affected })))
}

/// DELETE /api/notifications/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.notifications.delete(&auth, id).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "message": "Deleted" }),
    )))
}

/// DELETE /api/notifications
pub async fn delete_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    let affected = state.notifications.delete_all(&auth).await?;
    Ok(Json(ApiResponse::ok(AffectedResponse { affected })))
}
