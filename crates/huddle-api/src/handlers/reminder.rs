//! Event reminder handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;

use huddle_entity::reminder::{EventReminder, NewEventReminder};

use crate::dto::request::ScheduleReminderRequest;
use crate::dto::response::{ApiResponse, SweepResponse};
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/reminders
pub async fn schedule(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ScheduleReminderRequest>,
) -> Result<Json<ApiResponse<EventReminder>>, ApiError> {
    validate(&request)?;
    let reminder = state
        .reminders
        .schedule(NewEventReminder {
            user_id: auth.user_id,
            event_id: request.event_id,
            title: request.title,
            body: request.body,
            trigger_time: request.trigger_time,
        })
        .await?;
    Ok(Json(ApiResponse::ok(reminder)))
}

/// GET /api/reminders
pub async fn upcoming(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<EventReminder>>>, ApiError> {
    let rows = state.reminders.upcoming(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(rows)))
}

/// POST /api/reminders/sweep
///
/// Session-start reconciliation of the caller's reminder rows.
pub async fn sweep(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<SweepResponse>>, ApiError> {
    let report = state.reminders.sweep(auth.user_id, Utc::now()).await?;
    Ok(Json(ApiResponse::ok(SweepResponse {
        marked_sent: report.marked_sent,
        cleaned: report.cleaned,
    })))
}
