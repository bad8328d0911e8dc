//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::ApiResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::ok(serde_json::json!({
        "status": "ok",
        "connections": state.hub.connection_count(),
    })))
}
