//! Conversation repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::conversation::{Conversation, ParticipantSlot};

use super::db_err;
use crate::stores::ConversationStore;

/// PostgreSQL-backed conversation store.
///
/// The unique index on (participant_1_id, participant_2_id) is the
/// synchronization primitive for concurrent resolution; `insert`
/// surfaces it as a `Conflict` the resolver recovers from.
#[derive(Debug, Clone)]
pub struct PgConversationStore {
    pool: PgPool,
}

impl PgConversationStore {
    /// Create a new conversation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationStore for PgConversationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Conversation>> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find conversation", e))
    }

    async fn find_by_pair(&self, p1: Uuid, p2: Uuid) -> AppResult<Option<Conversation>> {
        sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations WHERE participant_1_id = $1 AND participant_2_id = $2",
        )
        .bind(p1)
        .bind(p2)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find conversation by pair", e))
    }

    async fn insert(&self, p1: Uuid, p2: Uuid) -> AppResult<Conversation> {
        sqlx::query_as::<_, Conversation>(
            "INSERT INTO conversations (participant_1_id, participant_2_id) \
             VALUES ($1, $2) RETURNING *",
        )
        .bind(p1)
        .bind(p2)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert conversation", e))
    }

    async fn touch_last_message(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE conversations SET last_message_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to touch last_message_at", e))?;
        Ok(())
    }

    async fn set_last_read(
        &self,
        id: Uuid,
        slot: ParticipantSlot,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let sql = match slot {
            ParticipantSlot::First => {
                "UPDATE conversations SET participant_1_last_read_at = $2 WHERE id = $1"
            }
            ParticipantSlot::Second => {
                "UPDATE conversations SET participant_2_last_read_at = $2 WHERE id = $1"
            }
        };

        sqlx::query(sql)
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to set last_read_at", e))?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Conversation>> {
        sqlx::query_as::<_, Conversation>(
            "SELECT * FROM conversations \
             WHERE participant_1_id = $1 OR participant_2_id = $1 \
             ORDER BY last_message_at DESC NULLS LAST, created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list conversations", e))
    }
}
