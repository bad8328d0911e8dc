//! Push-token registration handlers.

use axum::Json;
use axum::extract::State;

use huddle_entity::device::{Device, NewDevice};

use crate::dto::request::{RegisterDeviceRequest, UnregisterDeviceRequest};
use crate::dto::response::ApiResponse;
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/devices
///
/// Registration rides along on app launch; a store failure is logged
/// by the registrar and answered with a null body rather than an
/// error, so it never blocks the session.
pub async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<RegisterDeviceRequest>,
) -> Result<Json<ApiResponse<Option<Device>>>, ApiError> {
    validate(&request)?;
    let device = state
        .devices
        .register_best_effort(NewDevice {
            user_id: auth.user_id,
            device_id: request.device_id,
            device_name: request.device_name,
            platform: request.platform,
            push_token: request.push_token,
        })
        .await;
    Ok(Json(ApiResponse::ok(device)))
}

/// GET /api/devices
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Device>>>, ApiError> {
    let devices = state.devices.list(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(devices)))
}

/// DELETE /api/devices
pub async fn unregister(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<UnregisterDeviceRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    validate(&request)?;
    let removed = state
        .devices
        .unregister(auth.user_id, &request.push_token)
        .await?;
    Ok(Json(ApiResponse::ok(serde_json::json!({
        "removed": removed,
    }))))
}
