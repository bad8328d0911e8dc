//! Event reminder repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::reminder::{EventReminder, NewEventReminder, ReminderStatus};

use super::db_err;
use crate::stores::ReminderStore;

/// PostgreSQL-backed reminder store.
///
/// `set_status` compares-and-sets in SQL, so concurrent sweeps and
/// event handlers race safely over the same row.
#[derive(Debug, Clone)]
pub struct PgReminderStore {
    pool: PgPool,
}

impl PgReminderStore {
    /// Create a new reminder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStore for PgReminderStore {
    async fn insert(&self, reminder: &NewEventReminder) -> AppResult<EventReminder> {
        sqlx::query_as::<_, EventReminder>(
            "INSERT INTO event_reminders (user_id, event_id, title, body, trigger_time, status) \
             VALUES ($1, $2, $3, $4, $5, 'pending') RETURNING *",
        )
        .bind(reminder.user_id)
        .bind(reminder.event_id)
        .bind(&reminder.title)
        .bind(&reminder.body)
        .bind(reminder.trigger_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_err("Failed to insert reminder", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EventReminder>> {
        sqlx::query_as::<_, EventReminder>("SELECT * FROM event_reminders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_err("Failed to find reminder", e))
    }

    async fn list_in_status(
        &self,
        user_id: Uuid,
        statuses: &[ReminderStatus],
    ) -> AppResult<Vec<EventReminder>> {
        sqlx::query_as::<_, EventReminder>(
            "SELECT * FROM event_reminders \
             WHERE user_id = $1 AND status = ANY($2) \
             ORDER BY trigger_time",
        )
        .bind(user_id)
        .bind(statuses)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list reminders", e))
    }

    async fn due_before(&self, at: DateTime<Utc>) -> AppResult<Vec<EventReminder>> {
        sqlx::query_as::<_, EventReminder>(
            "SELECT * FROM event_reminders \
             WHERE trigger_time <= $1 AND status = ANY($2) \
             ORDER BY trigger_time",
        )
        .bind(at)
        .bind(ReminderStatus::deliverable())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_err("Failed to list due reminders", e))
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: &[ReminderStatus],
        to: ReminderStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE event_reminders SET status = $3 \
             WHERE id = $1 AND status = ANY($2)",
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to transition reminder status", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn cancel_for_event(&self, event_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE event_reminders SET status = 'cancelled' \
             WHERE event_id = $1 AND status = ANY($2)",
        )
        .bind(event_id)
        .bind(ReminderStatus::deliverable())
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to cancel reminders for event", e))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM event_reminders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_err("Failed to delete reminder", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_finished_before(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM event_reminders \
             WHERE created_at < $1 AND status IN ('sent', 'cancelled')",
        )
        .bind(before)
        .execute(&self.pool)
        .await
        .map_err(|e| db_err("Failed to delete finished reminders", e))?;
        Ok(result.rows_affected())
    }
}
