//! Message entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A chat message owned by its conversation.
///
/// Immutable after creation except for the `read` flag, which the
/// recipient's mark-read path flips.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    /// Unique message identifier.
    pub id: Uuid,
    /// The conversation this message belongs to.
    pub conversation_id: Uuid,
    /// The author.
    pub sender_id: Uuid,
    /// Message text.
    pub content: String,
    /// Whether the recipient has read this message.
    pub read: bool,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a new message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    /// Pre-assigned message ID (assigned by the sender so the
    /// optimistic copy and the server echo share one identity).
    pub id: Uuid,
    /// Target conversation.
    pub conversation_id: Uuid,
    /// The author.
    pub sender_id: Uuid,
    /// Message text.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Create a new message with a fresh ID and the current time.
    ///
    /// IDs are UUIDv7 so id order tracks creation time; the timeline's
    /// `(created_at, id)` tiebreak depends on this.
    pub fn now(conversation_id: Uuid, sender_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            conversation_id,
            sender_id,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_assigns_time_ordered_ids() {
        let a = NewMessage::now(Uuid::new_v4(), Uuid::new_v4(), "first");
        assert_eq!(a.id.get_version_num(), 7);

        // v7 embeds a millisecond timestamp in the high bits, so ids
        // minted at least 1ms apart compare in creation order.
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = NewMessage::now(Uuid::new_v4(), Uuid::new_v4(), "second");
        assert!(a.id < b.id);
    }
}
