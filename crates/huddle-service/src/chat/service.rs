//! Chat orchestration: conversation resolution, sending, read state.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use huddle_core::config::chat::ChatConfig;
use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_database::stores::{ConversationStore, MessageStore, UserStore};
use huddle_entity::conversation::{Conversation, canonical_pair};
use huddle_entity::message::{Message, NewMessage};
use huddle_entity::notification::{NewNotification, NotificationPayload};
use huddle_realtime::change::{ChangeEvent, ChangeRecord};
use huddle_realtime::dispatcher::NotificationDispatcher;

use super::sender::SenderCache;
use super::session::ChatSession;

/// Chat use cases over the conversation and message stores.
pub struct ChatService {
    conversations: Arc<dyn ConversationStore>,
    messages: Arc<dyn MessageStore>,
    users: Arc<dyn UserStore>,
    dispatcher: Arc<NotificationDispatcher>,
    config: ChatConfig,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        messages: Arc<dyn MessageStore>,
        users: Arc<dyn UserStore>,
        dispatcher: Arc<NotificationDispatcher>,
        config: ChatConfig,
    ) -> Self {
        Self {
            conversations,
            messages,
            users,
            dispatcher,
            config,
        }
    }

    /// Resolve the single conversation for an unordered pair of users,
    /// creating it if absent.
    ///
    /// Race-safe: when two callers resolve the same missing pair at
    /// once, the loser's insert hits the unique index and falls back
    /// to re-querying the winner's row. Idempotent in either argument
    /// order.
    pub async fn resolve_conversation(&self, a: Uuid, b: Uuid) -> AppResult<Conversation> {
        if a == b {
            return Err(AppError::validation(
                "Cannot open a conversation with yourself",
            ));
        }
        let (p1, p2) = canonical_pair(a, b);

        if let Some(existing) = self.conversations.find_by_pair(p1, p2).await? {
            return Ok(existing);
        }

        match self.conversations.insert(p1, p2).await {
            Ok(created) => Ok(created),
            Err(e) if e.is_conflict() => {
                debug!(p1 = %p1, p2 = %p2, "Concurrent conversation insert, re-querying");
                self.conversations
                    .find_by_pair(p1, p2)
                    .await?
                    .ok_or_else(|| {
                        AppError::internal("Conversation vanished after conflicting insert")
                    })
            }
            Err(e) => Err(e),
        }
    }

    /// Persist and fan out a message.
    ///
    /// The message ID is pre-assigned by the caller, so the sender's
    /// optimistic timeline copy and the change-feed echo reconcile to
    /// one entry.
    pub async fn send(&self, sender_id: Uuid, new: NewMessage) -> AppResult<Message> {
        let content = new.content.trim();
        if content.is_empty() {
            return Err(AppError::validation("Message content is empty"));
        }
        if content.len() > self.config.max_content_length {
            return Err(AppError::validation("Message content is too long"));
        }
        if new.sender_id != sender_id {
            return Err(AppError::authorization("Sender mismatch"));
        }

        let mut conversation = self
            .conversations
            .find_by_id(new.conversation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation not found"))?;
        let recipient = conversation
            .other_participant(sender_id)
            .ok_or_else(|| AppError::authorization("Not a conversation participant"))?;

        let stored = self.messages.insert(&new).await?;
        self.conversations
            .touch_last_message(conversation.id, stored.created_at)
            .await?;
        conversation.last_message_at = Some(stored.created_at);

        self.dispatcher
            .publish(ChangeEvent::insert(ChangeRecord::Message(stored.clone())));
        self.dispatcher
            .publish(ChangeEvent::update(ChangeRecord::Conversation(
                conversation,
            )));

        let sender_name = self
            .users
            .find_by_id(sender_id)
            .await?
            .and_then(|u| u.display_name)
            .unwrap_or_else(|| "New message".to_string());
        self.dispatcher
            .notify(NewNotification {
                user_id: recipient,
                title: sender_name,
                body: stored.content.clone(),
                payload: NotificationPayload::Message {
                    conversation_id: stored.conversation_id,
                    message_id: stored.id,
                    sender_id,
                },
            })
            .await?;

        Ok(stored)
    }

    /// Mark everything the other participant wrote as read and advance
    /// the reader's high-water mark. Idempotent; returns rows flipped.
    pub async fn mark_read(&self, reader_id: Uuid, conversation_id: Uuid) -> AppResult<u64> {
        let mut conversation = self
            .conversations
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation not found"))?;
        let slot = conversation
            .slot_of(reader_id)
            .ok_or_else(|| AppError::authorization("Not a conversation participant"))?;
        let other = conversation
            .other_participant(reader_id)
            .ok_or_else(|| AppError::authorization("Not a conversation participant"))?;

        let flipped = self
            .messages
            .mark_read_from(conversation_id, other)
            .await?;
        let now = Utc::now();
        self.conversations
            .set_last_read(conversation_id, slot, now)
            .await?;

        match slot {
            huddle_entity::conversation::ParticipantSlot::First => {
                conversation.participant_1_last_read_at = Some(now);
            }
            huddle_entity::conversation::ParticipantSlot::Second => {
                conversation.participant_2_last_read_at = Some(now);
            }
        }
        self.dispatcher
            .publish(ChangeEvent::update(ChangeRecord::Conversation(
                conversation,
            )));

        Ok(flipped)
    }

    /// Unread message count from one friend, across the shared
    /// conversation. Zero when no conversation exists yet.
    pub async fn unread_from(&self, viewer_id: Uuid, friend_id: Uuid) -> AppResult<i64> {
        let (p1, p2) = canonical_pair(viewer_id, friend_id);
        match self.conversations.find_by_pair(p1, p2).await? {
            Some(conversation) => {
                self.messages
                    .count_unread_from(conversation.id, friend_id)
                    .await
            }
            None => Ok(0),
        }
    }

    /// Fetch the most recent page of history, chronologically ordered.
    pub async fn history(
        &self,
        viewer_id: Uuid,
        conversation_id: Uuid,
        limit: Option<u32>,
    ) -> AppResult<Vec<Message>> {
        let conversation = self
            .conversations
            .find_by_id(conversation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Conversation not found"))?;
        if !conversation.involves(viewer_id) {
            return Err(AppError::authorization("Not a conversation participant"));
        }

        let limit = limit.unwrap_or(self.config.history_page_size);
        let mut page = self.messages.recent(conversation_id, limit).await?;
        page.reverse();
        Ok(page)
    }

    /// List the viewer's conversations, most recently active first.
    pub async fn list_conversations(&self, viewer_id: Uuid) -> AppResult<Vec<Conversation>> {
        self.conversations.list_for_user(viewer_id).await
    }

    /// Open a live session: resolve the conversation, backfill the
    /// most recent history page, and mark the view read.
    pub async fn open_session(&self, viewer_id: Uuid, other_id: Uuid) -> AppResult<ChatSession> {
        let conversation = self.resolve_conversation(viewer_id, other_id).await?;
        let page = self
            .messages
            .recent(conversation.id, self.config.history_page_size)
            .await?;
        self.mark_read(viewer_id, conversation.id).await?;

        let mut session = ChatSession::new(
            conversation,
            viewer_id,
            SenderCache::new(Arc::clone(&self.users)),
        );
        session.backfill(page);
        Ok(session)
    }

    /// The configured history page size.
    pub fn history_page_size(&self) -> u32 {
        self.config.history_page_size
    }
}

#[cfg(test)]
mod tests {
    use huddle_core::config::push::PushConfig;
    use huddle_core::config::realtime::RealtimeConfig;
    use huddle_core::traits::gateway::PushGateway;
    use huddle_core::types::push::PushMessage;
    use huddle_database::memory::{
        MemoryConversationStore, MemoryDeviceStore, MemoryMessageStore, MemoryNotificationStore,
        MemoryUserStore,
    };
    use huddle_realtime::hub::ChangeFeedHub;

    use super::*;

    struct NullPush;

    #[async_trait::async_trait]
    impl PushGateway for NullPush {
        async fn send(&self, _token: &str, _message: &PushMessage) -> AppResult<()> {
            Ok(())
        }
    }

    fn uuid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn service() -> ChatService {
        let hub = Arc::new(ChangeFeedHub::new(&RealtimeConfig::default()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(MemoryNotificationStore::new()),
            Arc::new(MemoryDeviceStore::new()),
            Arc::new(NullPush),
            hub,
            &PushConfig {
                enabled: false,
                endpoint: String::new(),
                api_key: String::new(),
                timeout_seconds: 1,
                retry_attempts: 1,
                retry_base_delay_ms: 1,
            },
            &RealtimeConfig::default(),
        ));
        ChatService::new(
            Arc::new(MemoryConversationStore::new()),
            Arc::new(MemoryMessageStore::new()),
            Arc::new(MemoryUserStore::new()),
            dispatcher,
            ChatConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_resolve_is_symmetric() {
        let chat = service();
        let (a, b) = (uuid(1), uuid(2));
        let first = chat.resolve_conversation(a, b).await.unwrap();
        let second = chat.resolve_conversation(b, a).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.participant_1_id, uuid(1));
        assert_eq!(first.participant_2_id, uuid(2));
    }

    #[tokio::test]
    async fn test_concurrent_resolves_share_one_row() {
        let chat = Arc::new(service());
        let (a, b) = (uuid(1), uuid(2));

        let (left, right) = tokio::join!(
            chat.resolve_conversation(a, b),
            chat.resolve_conversation(b, a)
        );
        assert_eq!(left.unwrap().id, right.unwrap().id);
        assert_eq!(chat.list_conversations(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_self_conversation_rejected() {
        let chat = service();
        let err = chat.resolve_conversation(uuid(1), uuid(1)).await.unwrap_err();
        assert_eq!(err.kind, huddle_core::error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let chat = service();
        let (alice, bob) = (uuid(1), uuid(2));
        let conversation = chat.resolve_conversation(alice, bob).await.unwrap();

        chat.send(bob, NewMessage::now(conversation.id, bob, "hi"))
            .await
            .unwrap();
        chat.send(bob, NewMessage::now(conversation.id, bob, "there"))
            .await
            .unwrap();
        assert_eq!(chat.unread_from(alice, bob).await.unwrap(), 2);

        assert_eq!(chat.mark_read(alice, conversation.id).await.unwrap(), 2);
        assert_eq!(chat.unread_from(alice, bob).await.unwrap(), 0);
        assert_eq!(chat.mark_read(alice, conversation.id).await.unwrap(), 0);
        assert_eq!(chat.unread_from(alice, bob).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_send_requires_participant() {
        let chat = service();
        let conversation = chat.resolve_conversation(uuid(1), uuid(2)).await.unwrap();
        let outsider = uuid(3);
        let err = chat
            .send(outsider, NewMessage::now(conversation.id, outsider, "hi"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, huddle_core::error::ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let chat = service();
        let conversation = chat.resolve_conversation(uuid(1), uuid(2)).await.unwrap();
        let err = chat
            .send(uuid(1), NewMessage::now(conversation.id, uuid(1), "   "))
            .await
            .unwrap_err();
        assert_eq!(err.kind, huddle_core::error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_history_is_chronological() {
        let chat = service();
        let conversation = chat.resolve_conversation(uuid(1), uuid(2)).await.unwrap();
        let base = Utc::now();
        for (i, text) in ["one", "two", "three"].into_iter().enumerate() {
            let new = NewMessage {
                created_at: base + chrono::Duration::seconds(i as i64),
                ..NewMessage::now(conversation.id, uuid(1), text)
            };
            chat.send(uuid(1), new).await.unwrap();
        }

        let page = chat.history(uuid(2), conversation.id, None).await.unwrap();
        let contents: Vec<&str> = page.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }
}
