//! Calendar feed token repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::feed::FeedToken;

use super::db_err;
use crate::stores::FeedTokenStore;

/// PostgreSQL-backed feed token store.
#[derive(Debug, Clone)]
pub struct PgFeedTokenStore {
    pool: PgPool,
}

impl PgFeedTokenStore {
    /// Create a new feed token repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedTokenStore for PgFeedTokenStore {
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<FeedToken>> {
        sqlx::query_as::<_, FeedToken>("SELECT * FROM feed_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find feed token", e))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<FeedToken>> {
        sqlx::query_as::<_, FeedToken>("SELECT * FROM feed_tokens WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to resolve feed token", e))
    }

    async fn replace(&self, user_id: Uuid, token: &str) -> AppResult<FeedToken> {
        sqlx::query_as::<_, FeedToken>(
            "INSERT INTO feed_tokens (user_id, token) VALUES ($1, $2) \
             ON CONFLICT (user_id) \
             DO UPDATE SET token = EXCLUDED.token, created_at = NOW() \
             RETURNING *",
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to replace feed token", e))
    }
}
