//! In-memory reminder store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::reminder::{EventReminder, NewEventReminder, ReminderStatus};

use crate::stores::ReminderStore;

/// Map-backed reminder store with the same guarded status transitions
/// as the SQL implementation.
#[derive(Debug, Default)]
pub struct MemoryReminderStore {
    rows: Mutex<HashMap<Uuid, EventReminder>>,
}

impl MemoryReminderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderStore for MemoryReminderStore {
    async fn insert(&self, reminder: &NewEventReminder) -> AppResult<EventReminder> {
        let row = EventReminder {
            id: Uuid::new_v4(),
            user_id: reminder.user_id,
            event_id: reminder.event_id,
            title: reminder.title.clone(),
            body: reminder.body.clone(),
            trigger_time: reminder.trigger_time,
            status: ReminderStatus::Pending,
            local_notification_id: None,
            created_at: Utc::now(),
        };
        self.rows.lock().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<EventReminder>> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn list_in_status(
        &self,
        user_id: Uuid,
        statuses: &[ReminderStatus],
    ) -> AppResult<Vec<EventReminder>> {
        let mut list: Vec<EventReminder> = self
            .rows
            .lock()
            .await
            .values()
            .filter(|r| r.user_id == user_id && statuses.contains(&r.status))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.trigger_time.cmp(&b.trigger_time));
        Ok(list)
    }

    async fn due_before(&self, at: DateTime<Utc>) -> AppResult<Vec<EventReminder>> {
        let mut list: Vec<EventReminder> = self
            .rows
            .lock()
            .await
            .values()
            .filter(|r| r.trigger_time <= at && ReminderStatus::deliverable().contains(&r.status))
            .cloned()
            .collect();
        list.sort_by(|a, b| a.trigger_time.cmp(&b.trigger_time));
        Ok(list)
    }

    async fn set_status(
        &self,
        id: Uuid,
        from: &[ReminderStatus],
        to: ReminderStatus,
    ) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&id) {
            Some(row) if from.contains(&row.status) => {
                row.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn cancel_for_event(&self, event_id: Uuid) -> AppResult<u64> {
        let mut cancelled = 0;
        for row in self.rows.lock().await.values_mut() {
            if row.event_id == event_id && ReminderStatus::deliverable().contains(&row.status) {
                row.status = ReminderStatus::Cancelled;
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.rows.lock().await.remove(&id).is_some())
    }

    async fn delete_finished_before(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let count = rows.len();
        rows.retain(|_, r| !(r.created_at < before && r.status.is_terminal()));
        Ok((count - rows.len()) as u64)
    }
}
