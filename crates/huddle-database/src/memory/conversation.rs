//! In-memory conversation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_entity::conversation::{Conversation, ParticipantSlot};

use crate::stores::ConversationStore;

/// Map-backed conversation store enforcing the canonical-pair
/// uniqueness the database index provides.
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    rows: Mutex<HashMap<Uuid, Conversation>>,
}

impl MemoryConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn find_by_pair(&self, p1: Uuid, p2: Uuid) -> AppResult<Option<Conversation>> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|c| c.participant_1_id == p1 && c.participant_2_id == p2)
            .cloned())
    }

    async fn insert(&self, p1: Uuid, p2: Uuid) -> AppResult<Conversation> {
        let mut rows = self.rows.lock().await;
        if rows
            .values()
            .any(|c| c.participant_1_id == p1 && c.participant_2_id == p2)
        {
            return Err(AppError::conflict("Conversation already exists for pair"));
        }

        let conversation = Conversation {
            id: Uuid::new_v4(),
            participant_1_id: p1,
            participant_2_id: p2,
            last_message_at: None,
            participant_1_last_read_at: None,
            participant_2_last_read_at: None,
            created_at: Utc::now(),
        };
        rows.insert(conversation.id, conversation.clone());
        Ok(conversation)
    }

    async fn touch_last_message(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(row) = self.rows.lock().await.get_mut(&id) {
            row.last_message_at = Some(at);
        }
        Ok(())
    }

    async fn set_last_read(
        &self,
        id: Uuid,
        slot: ParticipantSlot,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(row) = self.rows.lock().await.get_mut(&id) {
            match slot {
                ParticipantSlot::First => row.participant_1_last_read_at = Some(at),
                ParticipantSlot::Second => row.participant_2_last_read_at = Some(at),
            }
        }
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Conversation>> {
        let mut list: Vec<Conversation> = self
            .rows
            .lock()
            .await
            .values()
            .filter(|c| c.involves(user_id))
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            b.last_message_at
                .unwrap_or(b.created_at)
                .cmp(&a.last_message_at.unwrap_or(a.created_at))
        });
        Ok(list)
    }
}
