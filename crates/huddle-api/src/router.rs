//! Route definitions for the Huddle HTTP API.
//!
//! Authenticated REST routes live under `/api`; the WebSocket upgrade
//! and the tokened calendar feed are mounted at the root.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(user_routes())
        .merge(chat_routes())
        .merge(friend_routes())
        .merge(notification_routes())
        .merge(device_routes())
        .merge(reminder_routes())
        .merge(schedule_routes())
        .merge(platform_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(handlers::ws::ws_upgrade))
        .route("/feed/{file}", get(handlers::schedule::serve_feed))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&state))
        .with_state(state)
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let origins = &state.config.server.cors.allowed_origins;
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect::<Vec<_>>();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(handlers::user::get_profile))
        .route("/users/me", put(handlers::user::update_profile))
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/conversations", post(handlers::chat::resolve))
        .route("/conversations", get(handlers::chat::list))
        .route(
            "/conversations/{id}/messages",
            get(handlers::chat::history),
        )
        .route("/conversations/{id}/messages", post(handlers::chat::send))
        .route("/conversations/{id}/read", put(handlers::chat::mark_read))
}

fn friend_routes() -> Router<AppState> {
    Router::new()
        .route("/friends", get(handlers::friend::list))
        .route("/friends/requests", post(handlers::friend::send_request))
        .route("/friends/requests", get(handlers::friend::pending_requests))
        .route(
            "/friends/requests/{id}/accept",
            put(handlers::friend::accept),
        )
        .route(
            "/friends/requests/{id}/decline",
            put(handlers::friend::decline),
        )
        .route("/friends/{id}", delete(handlers::friend::remove))
        .route("/friends/{id}/unread", get(handlers::chat::unread_from))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(handlers::notification::list))
        .route("/notifications", delete(handlers::notification::delete_all))
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete),
        )
}

fn device_routes() -> Router<AppState> {
    Router::new()
        .route("/devices", post(handlers::device::register))
        .route("/devices", get(handlers::device::list))
        .route("/devices", delete(handlers::device::unregister))
}

fn reminder_routes() -> Router<AppState> {
    Router::new()
        .route("/reminders", post(handlers::reminder::schedule))
        .route("/reminders", get(handlers::reminder::upcoming))
        .route("/reminders/sweep", post(handlers::reminder::sweep))
}

fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(handlers::schedule::create_event))
        .route("/events", get(handlers::schedule::list_events))
        .route("/events/{id}", get(handlers::schedule::get_event))
        .route("/events/{id}", delete(handlers::schedule::delete_event))
        .route("/events/{id}/invite", post(handlers::schedule::invite))
        .route("/feed", get(handlers::schedule::feed_links))
        .route("/feed/rotate", post(handlers::schedule::rotate_feed))
}

fn platform_routes() -> Router<AppState> {
    Router::new()
        .route("/platform/connect", post(handlers::platform::connect))
        .route("/platform/callback", post(handlers::platform::callback))
}
