//! Team schedule, calendar feed, and invite handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_entity::event::{EventSource, NewTeamEvent, TeamEvent};
use huddle_service::schedule::feed::FeedLinks;

use crate::dto::request::{CreateEventRequest, InviteRequest};
use crate::dto::response::ApiResponse;
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Query parameters for schedule listing.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Schedule owner; defaults to the caller.
    pub owner_id: Option<Uuid>,
}

/// POST /api/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<Json<ApiResponse<TeamEvent>>, ApiError> {
    validate(&request)?;
    let event = state
        .schedule
        .create_event(
            auth.user_id,
            NewTeamEvent {
                owner_id: auth.user_id,
                team_name: request.team_name,
                title: request.title,
                location: request.location,
                starts_at: request.starts_at,
                ends_at: request.ends_at,
                source: EventSource::Manual,
                external_id: None,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// GET /api/events
pub async fn list_events(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<Vec<TeamEvent>>>, ApiError> {
    let owner = params.owner_id.unwrap_or(auth.user_id);
    let events = state.schedule.list_events(auth.user_id, owner).await?;
    Ok(Json(ApiResponse::ok(events)))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TeamEvent>>, ApiError> {
    let event = state.schedule.get_event(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(event)))
}

/// DELETE /api/events/{id}
pub async fn delete_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    state.schedule.delete_event(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "message": "Deleted" }),
    )))
}

/// POST /api/events/{id}/invite
pub async fn invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<InviteRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    validate(&request)?;
    state
        .invites
        .send_invite(auth.user_id, id, &request.email)
        .await?;
    Ok(Json(ApiResponse::ok(
        serde_json::json!({ "message": "Invite sent" }),
    )))
}

/// GET /api/feed
pub async fn feed_links(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<FeedLinks>>, ApiError> {
    let links = state.feed.links(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(links)))
}

/// POST /api/feed/rotate
pub async fn rotate_feed(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<FeedLinks>>, ApiError> {
    let links = state.feed.rotate(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(links)))
}

/// GET /feed/{token}.ics
///
/// Unauthenticated; the secret token in the path is the credential.
pub async fn serve_feed(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Response, ApiError> {
    let token = file
        .strip_suffix(".ics")
        .ok_or_else(|| AppError::not_found("Unknown feed path"))?;
    let calendar = state.feed.render(token).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/calendar; charset=utf-8")],
        calendar,
    )
        .into_response())
}
