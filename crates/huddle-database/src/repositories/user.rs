//! User profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::user::{UpsertUser, User};

use super::db_err;
use crate::stores::UserStore;

/// PostgreSQL-backed user store.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find user", e))
    }

    async fn upsert(&self, user: &UpsertUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, display_name, photo_url) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                 email = COALESCE(EXCLUDED.email, users.email), \
                 display_name = COALESCE(EXCLUDED.display_name, users.display_name), \
                 photo_url = COALESCE(EXCLUDED.photo_url, users.photo_url), \
                 updated_at = NOW() \
             RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.photo_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to upsert user", e))
    }
}
