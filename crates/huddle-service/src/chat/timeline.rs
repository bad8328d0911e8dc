//! In-memory message timeline with echo reconciliation.
//!
//! A sender appends its own message optimistically, then receives the
//! same row back over the change feed. Both copies share one ID, so
//! the timeline keys by ID and an insert for a known message replaces
//! the optimistic copy instead of appending a duplicate. Delivery
//! order is irrelevant: reads sort by `(created_at, id)`.

use std::collections::HashMap;

use uuid::Uuid;

use huddle_entity::message::Message;

/// One timeline entry: the message plus display metadata.
#[derive(Debug, Clone)]
pub struct TimelineMessage {
    /// The message row.
    pub message: Message,
    /// Sender display name, once resolved.
    pub sender_name: Option<String>,
    /// True while the entry is an optimistic local copy the server
    /// has not yet echoed back.
    pub pending: bool,
}

/// The reconciled message view of one conversation.
#[derive(Debug, Default)]
pub struct MessageTimeline {
    entries: HashMap<Uuid, TimelineMessage>,
}

impl MessageTimeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an optimistic local copy of a just-sent message.
    pub fn apply_local(&mut self, message: Message) {
        self.entries.entry(message.id).or_insert(TimelineMessage {
            message,
            sender_name: None,
            pending: true,
        });
    }

    /// Apply a message insert from the change feed.
    ///
    /// Idempotent: a re-delivered insert, or the echo of an optimistic
    /// local copy, replaces the stored row by ID and never appends.
    pub fn apply_insert(&mut self, message: Message, sender_name: Option<String>) {
        match self.entries.get_mut(&message.id) {
            Some(entry) => {
                entry.message = message;
                entry.pending = false;
                if entry.sender_name.is_none() {
                    entry.sender_name = sender_name;
                }
            }
            None => {
                self.entries.insert(message.id, TimelineMessage {
                    message,
                    sender_name,
                    pending: false,
                });
            }
        }
    }

    /// Apply a message update (read-flag flip) from the change feed.
    ///
    /// Replaces in place by ID; an update for an unknown message is
    /// dropped, never appended. Returns whether a row changed.
    pub fn apply_update(&mut self, message: Message) -> bool {
        match self.entries.get_mut(&message.id) {
            Some(entry) => {
                entry.message = message;
                entry.pending = false;
                true
            }
            None => false,
        }
    }

    /// Remove a message by ID.
    pub fn apply_delete(&mut self, id: Uuid) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Merge a history page fetched newest-first from the store.
    ///
    /// Existing entries win, so a backfill racing the change feed
    /// cannot clobber a fresher row.
    pub fn backfill(&mut self, newest_first: Vec<Message>) {
        for message in newest_first {
            self.entries.entry(message.id).or_insert(TimelineMessage {
                message,
                sender_name: None,
                pending: false,
            });
        }
    }

    /// The timeline in chronological order.
    pub fn messages(&self) -> Vec<&TimelineMessage> {
        let mut list: Vec<&TimelineMessage> = self.entries.values().collect();
        list.sort_by(|a, b| {
            (a.message.created_at, a.message.id).cmp(&(b.message.created_at, b.message.id))
        });
        list
    }

    /// Whether a message is present.
    pub fn contains(&self, id: Uuid) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the timeline is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn message(id: u8, minutes: i64) -> Message {
        Message {
            id: uuid(id),
            conversation_id: uuid(100),
            sender_id: uuid(200),
            content: format!("m{id}"),
            read: false,
            created_at: Utc::now() + Duration::minutes(minutes),
        }
    }

    #[test]
    fn test_echo_replaces_optimistic_copy() {
        let mut timeline = MessageTimeline::new();
        let sent = message(1, 0);
        timeline.apply_local(sent.clone());
        assert!(timeline.messages()[0].pending);

        timeline.apply_insert(sent, Some("Alice".to_string()));
        assert_eq!(timeline.len(), 1);
        let entry = &timeline.messages()[0];
        assert!(!entry.pending);
        assert_eq!(entry.sender_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut timeline = MessageTimeline::new();
        let m = message(1, 0);
        timeline.apply_insert(m.clone(), None);
        timeline.apply_insert(m, None);
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_sorted_regardless_of_delivery_order() {
        let mut timeline = MessageTimeline::new();
        timeline.apply_insert(message(3, 30), None);
        timeline.apply_insert(message(1, 10), None);
        timeline.apply_insert(message(2, 20), None);

        let order: Vec<Uuid> = timeline
            .messages()
            .iter()
            .map(|e| e.message.id)
            .collect();
        assert_eq!(order, vec![uuid(1), uuid(2), uuid(3)]);
    }

    #[test]
    fn test_update_never_appends() {
        let mut timeline = MessageTimeline::new();
        assert!(!timeline.apply_update(message(1, 0)));
        assert!(timeline.is_empty());

        timeline.apply_insert(message(1, 0), None);
        let mut read = message(1, 0);
        read.read = true;
        assert!(timeline.apply_update(read));
        assert!(timeline.messages()[0].message.read);
    }

    #[test]
    fn test_backfill_merges_without_duplicates() {
        let mut timeline = MessageTimeline::new();
        timeline.apply_insert(message(2, 20), None);

        // Store pages arrive newest-first.
        timeline.backfill(vec![message(2, 20), message(1, 10)]);
        assert_eq!(timeline.len(), 2);
        let order: Vec<Uuid> = timeline
            .messages()
            .iter()
            .map(|e| e.message.id)
            .collect();
        assert_eq!(order, vec![uuid(1), uuid(2)]);
    }
}
