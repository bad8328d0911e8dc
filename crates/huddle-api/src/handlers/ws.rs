//! WebSocket change-feed endpoint.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use huddle_realtime::ChannelType;
use huddle_realtime::message::{InboundMessage, OutboundMessage};

use crate::error::ApiError;
use crate::extractors::auth::decode_token;
use crate::state::AppState;

/// Server keepalive ping interval.
const PING_INTERVAL_SECS: u64 = 30;

/// Query parameter for WebSocket authentication.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Bearer token; browsers cannot set headers on WS upgrades.
    pub token: String,
}

/// GET /ws?token={jwt}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    let claims = decode_token(&query.token, &state.config.auth).map_err(ApiError)?;
    Ok(ws.on_upgrade(move |socket| handle_connection(state, claims.sub, socket)))
}

async fn handle_connection(state: AppState, user_id: Uuid, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let conn_id = state.hub.connect(tx.clone());

    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket connected");

    let outbound = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let Ok(json) = serde_json::to_string(&message) else {
                continue;
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let ping_tx = tx.clone();
    let keepalive = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(PING_INTERVAL_SECS));
        interval.tick().await;
        loop {
            interval.tick().await;
            let ping = OutboundMessage::Ping {
                timestamp: chrono::Utc::now().timestamp_millis(),
            };
            if ping_tx.send(ping).is_err() {
                break;
            }
        }
    });

    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_inbound(&state, user_id, conn_id, text.as_str(), &tx).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    outbound.abort();
    keepalive.abort();
    state.hub.disconnect(conn_id);
    info!(conn_id = %conn_id, user_id = %user_id, "WebSocket disconnected");
}

async fn handle_inbound(
    state: &AppState,
    user_id: Uuid,
    conn_id: Uuid,
    text: &str,
    tx: &mpsc::UnboundedSender<OutboundMessage>,
) {
    let message: InboundMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(_) => {
            let _ = tx.send(OutboundMessage::Error {
                code: "BAD_MESSAGE".to_string(),
                message: "Unrecognized message".to_string(),
            });
            return;
        }
    };

    match message {
        InboundMessage::Subscribe { channel } => {
            match authorize_channel(state, user_id, &channel).await {
                Ok(parsed) => {
                    let reply = match state.hub.subscribe(conn_id, parsed) {
                        Ok(()) => OutboundMessage::Subscribed { channel },
                        Err(e) => OutboundMessage::Error {
                            code: e.kind.to_string(),
                            message: e.message,
                        },
                    };
                    let _ = tx.send(reply);
                }
                Err(e) => {
                    let _ = tx.send(OutboundMessage::Error {
                        code: e.kind.to_string(),
                        message: e.message,
                    });
                }
            }
        }
        InboundMessage::Unsubscribe { channel } => {
            if let Some(parsed) = ChannelType::parse(&channel) {
                state.hub.unsubscribe(conn_id, parsed);
                let _ = tx.send(OutboundMessage::Unsubscribed { channel });
            }
        }
        InboundMessage::Pong { .. } => {}
    }
}

/// A connection may join its own user channel and the channels of
/// conversations it participates in.
async fn authorize_channel(
    state: &AppState,
    user_id: Uuid,
    channel: &str,
) -> Result<ChannelType, huddle_core::error::AppError> {
    use huddle_core::error::AppError;

    let parsed = ChannelType::parse(channel)
        .ok_or_else(|| AppError::validation("Unrecognized channel"))?;
    match parsed {
        ChannelType::User(id) if id == user_id => Ok(parsed),
        ChannelType::User(_) => Err(AppError::authorization("Not your user channel")),
        ChannelType::Conversation(id) => {
            let conversation = state
                .conversations
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::not_found("Conversation not found"))?;
            if conversation.involves(user_id) {
                Ok(parsed)
            } else {
                Err(AppError::authorization("Not a conversation participant"))
            }
        }
    }
}
