//! Notification entity model with tagged payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// Kind of a notification, used for filtering and client navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Someone sent the user a friend request.
    FriendRequest,
    /// A shared event changed.
    ScheduleChange,
    /// A new event appeared on a followed schedule.
    NewEvent,
    /// A chat message arrived.
    Message,
}

impl NotificationKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FriendRequest => "friend_request",
            Self::ScheduleChange => "schedule_change",
            Self::NewEvent => "new_event",
            Self::Message => "message",
        }
    }
}

/// Structured payload carried by a notification, tagged by kind.
///
/// Consumers match exhaustively; there is no untyped escape hatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// A friend request was received.
    FriendRequest {
        /// The request row.
        request_id: Uuid,
        /// Who sent it.
        requester_id: Uuid,
    },
    /// A shared event was modified.
    ScheduleChange {
        /// The affected event.
        event_id: Uuid,
        /// Human-readable summary of what changed.
        description: String,
    },
    /// A new event was added to a followed schedule.
    NewEvent {
        /// The new event.
        event_id: Uuid,
    },
    /// A chat message arrived.
    Message {
        /// The conversation to open on tap.
        conversation_id: Uuid,
        /// The message itself.
        message_id: Uuid,
        /// The author.
        sender_id: Uuid,
    },
}

impl NotificationPayload {
    /// The kind this payload corresponds to.
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::FriendRequest { .. } => NotificationKind::FriendRequest,
            Self::ScheduleChange { .. } => NotificationKind::ScheduleChange,
            Self::NewEvent { .. } => NotificationKind::NewEvent,
            Self::Message { .. } => NotificationKind::Message,
        }
    }

    /// The resource this notification is about. Repeat notifications
    /// for the same resource collapse on the push path; for messages
    /// that resource is the conversation, not the individual message.
    pub fn resource_id(&self) -> Uuid {
        match self {
            Self::FriendRequest { request_id, .. } => *request_id,
            Self::ScheduleChange { event_id, .. } => *event_id,
            Self::NewEvent { event_id } => *event_id,
            Self::Message {
                conversation_id, ..
            } => *conversation_id,
        }
    }
}

/// A notification delivered to a user's notification center.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification kind (denormalized from the payload tag).
    pub kind: NotificationKind,
    /// Title shown in the notification center and push banner.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Whether the user has read this notification.
    pub read: bool,
    /// Tagged structured payload.
    pub payload: Json<NotificationPayload>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    /// The recipient user.
    pub user_id: Uuid,
    /// Title text.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Tagged payload; the kind column derives from its tag.
    pub payload: NotificationPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    #[test]
    fn test_payload_tag_round_trip() {
        let payload = NotificationPayload::Message {
            conversation_id: uuid(1),
            message_id: uuid(2),
            sender_id: uuid(3),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "message");

        let back: NotificationPayload = serde_json::from_value(json).unwrap();
        assert_eq!(back, payload);
        assert_eq!(back.kind(), NotificationKind::Message);
    }

    #[test]
    fn test_payload_kind_mapping() {
        let payload = NotificationPayload::FriendRequest {
            request_id: uuid(1),
            requester_id: uuid(2),
        };
        assert_eq!(payload.kind(), NotificationKind::FriendRequest);
        assert_eq!(payload.kind().as_str(), "friend_request");
    }
}
