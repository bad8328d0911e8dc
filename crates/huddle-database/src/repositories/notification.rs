//! Notification repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::notification::{NewNotification, Notification};

use super::db_err;
use crate::stores::NotificationStore;

/// PostgreSQL-backed notification store.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(&self, notification: &NewNotification) -> AppResult<Notification> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (user_id, kind, title, body, payload) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(notification.user_id)
        .bind(notification.payload.kind())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(Json(&notification.payload))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert notification", e))
    }

    async fn list_for_user(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list notifications", e))
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to mark notification read", e))?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| db_err("Failed to mark all notifications read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete notification", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, user_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete notifications", e))?;
        Ok(result.rows_affected())
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to count unread notifications", e))
    }

    async fn delete_older_than(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE created_at < $1")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete aged notifications", e))?;
        Ok(result.rows_affected())
    }

    async fn trim_per_user(&self, keep: i64) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id IN ( \
                 SELECT id FROM ( \
                     SELECT id, ROW_NUMBER() OVER ( \
                         PARTITION BY user_id ORDER BY created_at DESC \
                     ) AS rn FROM notifications \
                 ) ranked WHERE rn > $1 \
             )",
        )
        .bind(keep)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to trim notifications", e))?;
        Ok(result.rows_affected())
    }
}
