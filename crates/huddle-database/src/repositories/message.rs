//! Message repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::message::{Message, NewMessage};

use super::db_err;
use crate::stores::MessageStore;

/// PostgreSQL-backed message store.
#[derive(Debug, Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    /// Create a new message repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn insert(&self, message: &NewMessage) -> AppResult<Message> {
        sqlx::query_as::<_, Message>(
            "INSERT INTO messages (id, conversation_id, sender_id, content, created_at) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert message", e))
    }

    async fn recent(&self, conversation_id: Uuid, limit: u32) -> AppResult<Vec<Message>> {
        sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(conversation_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to fetch recent messages", e))
    }

    async fn mark_read_from(&self, conversation_id: Uuid, sender_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE messages SET read = TRUE \
             WHERE conversation_id = $1 AND sender_id = $2 AND read = FALSE",
        )
        .bind(conversation_id)
        .bind(sender_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to mark messages read", e))?;
        Ok(result.rows_affected())
    }

    async fn count_unread_from(&self, conversation_id: Uuid, sender_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages \
             WHERE conversation_id = $1 AND sender_id = $2 AND read = FALSE",
        )
        .bind(conversation_id)
        .bind(sender_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count unread messages", e))
    }
}
