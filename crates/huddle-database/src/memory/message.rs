//! In-memory message store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_entity::message::{Message, NewMessage};

use crate::stores::MessageStore;

/// Map-backed message store.
#[derive(Debug, Default)]
pub struct MemoryMessageStore {
    rows: Mutex<HashMap<Uuid, Message>>,
}

impl MemoryMessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn insert(&self, message: &NewMessage) -> AppResult<Message> {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&message.id) {
            return Err(AppError::conflict("Message ID already exists"));
        }
        let row = Message {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content.clone(),
            read: false,
            created_at: message.created_at,
        };
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn recent(&self, conversation_id: Uuid, limit: u32) -> AppResult<Vec<Message>> {
        let mut list: Vec<Message> = self
            .rows
            .lock()
            .await
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        list.truncate(limit as usize);
        Ok(list)
    }

    async fn mark_read_from(&self, conversation_id: Uuid, sender_id: Uuid) -> AppResult<u64> {
        let mut flipped = 0;
        for row in self.rows.lock().await.values_mut() {
            if row.conversation_id == conversation_id && row.sender_id == sender_id && !row.read {
                row.read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn count_unread_from(&self, conversation_id: Uuid, sender_id: Uuid) -> AppResult<i64> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|m| m.conversation_id == conversation_id && m.sender_id == sender_id && !m.read)
            .count() as i64)
    }
}
