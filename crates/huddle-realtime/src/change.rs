//! Row-change events published over the change feed.
//!
//! Clients keep their local view consistent by applying these events:
//! an insert for a message the sender already shows optimistically is
//! reconciled by ID, an update refreshes read flags in place.

use serde::{Deserialize, Serialize};

use huddle_entity::conversation::Conversation;
use huddle_entity::message::Message;
use huddle_entity::notification::Notification;
use huddle_entity::reminder::EventReminder;

use crate::channel::types::ChannelType;

/// What happened to the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    /// A row was created.
    Insert,
    /// A row was modified.
    Update,
    /// A row was removed.
    Delete,
}

/// The changed row, tagged by table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "table", content = "row", rename_all = "snake_case")]
pub enum ChangeRecord {
    /// A chat message row.
    Message(Message),
    /// A conversation row (read marks, last-message time).
    Conversation(Conversation),
    /// A notification-center row.
    Notification(Notification),
    /// A scheduled reminder row.
    EventReminder(EventReminder),
}

/// A single change-feed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// What happened.
    pub op: ChangeOp,
    /// The affected row.
    pub record: ChangeRecord,
}

impl ChangeEvent {
    /// An insert event.
    pub fn insert(record: ChangeRecord) -> Self {
        Self {
            op: ChangeOp::Insert,
            record,
        }
    }

    /// An update event.
    pub fn update(record: ChangeRecord) -> Self {
        Self {
            op: ChangeOp::Update,
            record,
        }
    }

    /// A delete event.
    pub fn delete(record: ChangeRecord) -> Self {
        Self {
            op: ChangeOp::Delete,
            record,
        }
    }

    /// The channels this event publishes to.
    ///
    /// Message rows go to their conversation channel; everything else
    /// goes to the channels of the users who can see the row.
    pub fn channels(&self) -> Vec<ChannelType> {
        match &self.record {
            ChangeRecord::Message(m) => vec![ChannelType::Conversation(m.conversation_id)],
            ChangeRecord::Conversation(c) => vec![
                ChannelType::Conversation(c.id),
                ChannelType::User(c.participant_1_id),
                ChannelType::User(c.participant_2_id),
            ],
            ChangeRecord::Notification(n) => vec![ChannelType::User(n.user_id)],
            ChangeRecord::EventReminder(r) => vec![ChannelType::User(r.user_id)],
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    #[test]
    fn test_message_event_targets_conversation_channel() {
        let event = ChangeEvent::insert(ChangeRecord::Message(Message {
            id: uuid(1),
            conversation_id: uuid(2),
            sender_id: uuid(3),
            content: "hi".to_string(),
            read: false,
            created_at: Utc::now(),
        }));
        assert_eq!(event.channels(), vec![ChannelType::Conversation(uuid(2))]);
    }

    #[test]
    fn test_conversation_event_reaches_both_participants() {
        let event = ChangeEvent::update(ChangeRecord::Conversation(Conversation {
            id: uuid(9),
            participant_1_id: uuid(1),
            participant_2_id: uuid(2),
            last_message_at: None,
            participant_1_last_read_at: None,
            participant_2_last_read_at: None,
            created_at: Utc::now(),
        }));
        let channels = event.channels();
        assert!(channels.contains(&ChannelType::User(uuid(1))));
        assert!(channels.contains(&ChannelType::User(uuid(2))));
    }

    #[test]
    fn test_serialized_event_is_table_tagged() {
        let event = ChangeEvent::insert(ChangeRecord::Message(Message {
            id: uuid(1),
            conversation_id: uuid(2),
            sender_id: uuid(3),
            content: "hi".to_string(),
            read: false,
            created_at: Utc::now(),
        }));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["op"], "insert");
        assert_eq!(json["record"]["table"], "message");
        assert_eq!(json["record"]["row"]["content"], "hi");
    }
}
