//! Device registration repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::device::{Device, NewDevice};

use super::db_err;
use crate::stores::DeviceStore;

/// PostgreSQL-backed device store.
///
/// The unique index on (user_id, push_token) backs the registrar's
/// delete-then-insert reconciliation; a duplicate insert surfaces as
/// `Conflict`.
#[derive(Debug, Clone)]
pub struct PgDeviceStore {
    pool: PgPool,
}

impl PgDeviceStore {
    /// Create a new device repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeviceStore for PgDeviceStore {
    async fn find_by_token(&self, user_id: Uuid, push_token: &str) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE user_id = $1 AND push_token = $2",
        )
        .bind(user_id)
        .bind(push_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find device by token", e))
    }

    async fn find_by_device(&self, user_id: Uuid, device_id: &str) -> AppResult<Option<Device>> {
        sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE user_id = $1 AND device_id = $2",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_err("Failed to find device by identifier", e))
    }

    async fn insert(&self, device: &NewDevice) -> AppResult<Device> {
        sqlx::query_as::<_, Device>(
            "INSERT INTO devices (user_id, device_id, device_name, platform, push_token) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(device.user_id)
        .bind(&device.device_id)
        .bind(&device.device_name)
        .bind(device.platform)
        .bind(&device.push_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert device", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete device", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn touch_last_active(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        sqlx::query("UPDATE devices SET last_active = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to touch device last_active", e))?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Device>> {
        sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE user_id = $1 ORDER BY last_active DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list devices", e))
    }

    async fn delete_inactive_since(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM devices WHERE last_active < $1")
            .bind(before)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to prune inactive devices", e))?;
        Ok(result.rows_affected())
    }
}
