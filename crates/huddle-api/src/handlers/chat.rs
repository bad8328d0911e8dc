//! Conversation and message handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use uuid::Uuid;

use huddle_entity::conversation::Conversation;
use huddle_entity::message::{Message, NewMessage};

use crate::dto::request::{ResolveConversationRequest, SendMessageRequest};
use crate::dto::response::{AffectedResponse, ApiResponse, CountResponse};
use crate::dto::validate;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// Query parameters for history paging.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Maximum messages to return.
    pub limit: Option<u32>,
}

/// POST /api/conversations
pub async fn resolve(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ResolveConversationRequest>,
) -> Result<Json<ApiResponse<Conversation>>, ApiError> {
    let conversation = state
        .chat
        .resolve_conversation(auth.user_id, request.other_id)
        .await?;
    Ok(Json(ApiResponse::ok(conversation)))
}

/// GET /api/conversations
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Conversation>>>, ApiError> {
    let conversations = state.chat.list_conversations(auth.user_id).await?;
    Ok(Json(ApiResponse::ok(conversations)))
}

/// GET /api/conversations/{id}/messages
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<ApiResponse<Vec<Message>>>, ApiError> {
    let page = state.chat.history(auth.user_id, id, params.limit).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// POST /api/conversations/{id}/messages
pub async fn send(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse<Message>>, ApiError> {
    validate(&request)?;
    let message = state
        .chat
        .send(auth.user_id, NewMessage::now(id, auth.user_id, request.content))
        .await?;
    Ok(Json(ApiResponse::ok(message)))
}

/// PUT /api/conversations/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AffectedResponse>>, ApiError> {
    let affected = state.chat.mark_read(auth.user_id, id).await?;
    Ok(Json(ApiResponse::ok(AffectedResponse { affected })))
}

/// GET /api/friends/{id}/unread
pub async fn unread_from(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(friend_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.chat.unread_from(auth.user_id, friend_id).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}
