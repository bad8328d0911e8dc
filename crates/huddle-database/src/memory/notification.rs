//! In-memory notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_entity::notification::{NewNotification, Notification};

use crate::stores::NotificationStore;

/// Map-backed notification store.
#[derive(Debug, Default)]
pub struct MemoryNotificationStore {
    rows: Mutex<HashMap<Uuid, Notification>>,
}

impl MemoryNotificationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: &NewNotification) -> AppResult<Notification> {
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            kind: notification.payload.kind(),
            title: notification.title.clone(),
            body: notification.body.clone(),
            read: false,
            payload: Json(notification.payload.clone()),
            created_at: Utc::now(),
        };
        self.rows.lock().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_for_user(&self, user_id: Uuid, limit: u32) -> AppResult<Vec<Notification>> {
        let mut list: Vec<Notification> = self
            .rows
            .lock()
            .await
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list.truncate(limit as usize);
        Ok(list)
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> AppResult<()> {
        if let Some(row) = self.rows.lock().await.get_mut(&id) {
            if row.user_id == user_id {
                row.read = true;
            }
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let mut flipped = 0;
        for row in self.rows.lock().await.values_mut() {
            if row.user_id == user_id && !row.read {
                row.read = true;
                flipped += 1;
            }
        }
        Ok(flipped)
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().await;
        let owned = rows.get(&id).is_some_and(|n| n.user_id == user_id);
        if owned {
            rows.remove(&id);
        }
        Ok(owned)
    }

    async fn delete_all(&self, user_id: Uuid) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|_, n| n.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|n| n.user_id == user_id && !n.read)
            .count() as i64)
    }

    async fn delete_older_than(&self, before: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let count = rows.len();
        rows.retain(|_, n| n.created_at >= before);
        Ok((count - rows.len()) as u64)
    }

    async fn trim_per_user(&self, keep: i64) -> AppResult<u64> {
        let mut rows = self.rows.lock().await;
        let mut per_user: HashMap<Uuid, Vec<(DateTime<Utc>, Uuid)>> = HashMap::new();
        for row in rows.values() {
            per_user
                .entry(row.user_id)
                .or_default()
                .push((row.created_at, row.id));
        }

        let mut removed = 0;
        for mut entries in per_user.into_values() {
            entries.sort_by(|a, b| b.cmp(a));
            for (_, id) in entries.into_iter().skip(keep as usize) {
                rows.remove(&id);
                removed += 1;
            }
        }
        Ok(removed)
    }
}
