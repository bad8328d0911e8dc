//! Live conversation view: timeline plus change-feed reconciliation.

use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::conversation::Conversation;
use huddle_entity::message::{Message, NewMessage};
use huddle_realtime::change::{ChangeEvent, ChangeOp, ChangeRecord};
use huddle_realtime::channel::types::ChannelType;

use super::sender::SenderCache;
use super::timeline::{MessageTimeline, TimelineMessage};

/// One open conversation from a single viewer's perspective.
///
/// Owns the reconciled [`MessageTimeline`] and applies change-feed
/// events to it. The caller subscribes the session's channel on its
/// WebSocket connection and feeds every received event through
/// [`ChatSession::apply_change`].
pub struct ChatSession {
    conversation: Conversation,
    viewer_id: Uuid,
    timeline: MessageTimeline,
    senders: SenderCache,
}

impl ChatSession {
    pub(crate) fn new(conversation: Conversation, viewer_id: Uuid, senders: SenderCache) -> Self {
        Self {
            conversation,
            viewer_id,
            timeline: MessageTimeline::new(),
            senders,
        }
    }

    /// The resolved conversation.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The change-feed channel this session listens on.
    pub fn channel(&self) -> ChannelType {
        ChannelType::Conversation(self.conversation.id)
    }

    /// Append an optimistic local copy and return the row to persist.
    ///
    /// The returned [`NewMessage`] carries the same pre-assigned ID as
    /// the timeline entry, so the eventual echo reconciles instead of
    /// duplicating.
    pub fn send_local(&mut self, content: impl Into<String>) -> NewMessage {
        let new = NewMessage::now(self.conversation.id, self.viewer_id, content);
        self.timeline.apply_local(Message {
            id: new.id,
            conversation_id: new.conversation_id,
            sender_id: new.sender_id,
            content: new.content.clone(),
            read: false,
            created_at: new.created_at,
        });
        new
    }

    pub(crate) fn backfill(&mut self, newest_first: Vec<Message>) {
        self.timeline.backfill(newest_first);
    }

    /// Apply one change-feed event. Events for other conversations are
    /// ignored. Returns whether the view changed.
    pub async fn apply_change(&mut self, event: &ChangeEvent) -> AppResult<bool> {
        match &event.record {
            ChangeRecord::Message(message) if message.conversation_id == self.conversation.id => {
                match event.op {
                    ChangeOp::Insert => {
                        let sender_name =
                            self.senders.display_name(message.sender_id).await?;
                        self.timeline.apply_insert(message.clone(), sender_name);
                        Ok(true)
                    }
                    ChangeOp::Update => Ok(self.timeline.apply_update(message.clone())),
                    ChangeOp::Delete => Ok(self.timeline.apply_delete(message.id)),
                }
            }
            ChangeRecord::Conversation(conversation)
                if conversation.id == self.conversation.id =>
            {
                self.conversation = conversation.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// The reconciled timeline in chronological order.
    pub fn messages(&self) -> Vec<&TimelineMessage> {
        self.timeline.messages()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use huddle_database::memory::MemoryUserStore;

    use super::*;

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn session(viewer: Uuid, other: Uuid) -> ChatSession {
        let (p1, p2) = huddle_entity::conversation::canonical_pair(viewer, other);
        ChatSession::new(
            Conversation {
                id: uuid(9),
                participant_1_id: p1,
                participant_2_id: p2,
                last_message_at: None,
                participant_1_last_read_at: None,
                participant_2_last_read_at: None,
                created_at: chrono::Utc::now(),
            },
            viewer,
            SenderCache::new(Arc::new(MemoryUserStore::new())),
        )
    }

    #[tokio::test]
    async fn test_optimistic_send_plus_echo_is_one_entry() {
        let (alice, bob) = (uuid(0xa1), uuid(0xb2));
        let mut session = session(alice, bob);
        assert_eq!(
            session.conversation().participant_1_id,
            std::cmp::min(alice, bob)
        );

        let new = session.send_local("see you at practice");
        assert_eq!(session.messages().len(), 1);
        assert!(session.messages()[0].pending);

        // Server echo arrives over the change feed.
        let echo = ChangeEvent::insert(ChangeRecord::Message(Message {
            id: new.id,
            conversation_id: new.conversation_id,
            sender_id: new.sender_id,
            content: new.content.clone(),
            read: false,
            created_at: new.created_at,
        }));
        assert!(session.apply_change(&echo).await.unwrap());
        assert_eq!(session.messages().len(), 1);
        assert!(!session.messages()[0].pending);

        // Re-delivery after reconnect changes nothing.
        session.apply_change(&echo).await.unwrap();
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_events_for_other_conversations_ignored() {
        let mut session = session(uuid(1), uuid(2));
        let foreign = ChangeEvent::insert(ChangeRecord::Message(Message {
            id: uuid(5),
            conversation_id: uuid(77),
            sender_id: uuid(2),
            content: "elsewhere".to_string(),
            read: false,
            created_at: chrono::Utc::now(),
        }));
        assert!(!session.apply_change(&foreign).await.unwrap());
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_conversation_update_refreshes_read_marks() {
        let mut session = session(uuid(1), uuid(2));
        let mut updated = session.conversation().clone();
        updated.participant_2_last_read_at = Some(chrono::Utc::now());

        let event = ChangeEvent::update(ChangeRecord::Conversation(updated.clone()));
        assert!(session.apply_change(&event).await.unwrap());
        assert_eq!(
            session.conversation().participant_2_last_read_at,
            updated.participant_2_last_read_at
        );
    }
}
