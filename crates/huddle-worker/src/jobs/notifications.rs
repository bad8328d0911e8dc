//! Notification retention cleanup.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use huddle_core::result::AppResult;
use huddle_database::stores::NotificationStore;

/// Removes notifications past the retention window and trims each
/// user's backlog to a fixed cap.
pub struct NotificationCleanupJob {
    notifications: Arc<dyn NotificationStore>,
    retention_days: i64,
    max_per_user: i64,
}

impl NotificationCleanupJob {
    /// Creates the job.
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        retention_days: i64,
        max_per_user: i64,
    ) -> Self {
        Self {
            notifications,
            retention_days,
            max_per_user,
        }
    }

    /// Run both passes. Returns (expired, overflow) counts.
    pub async fn run(&self) -> AppResult<(u64, u64)> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let expired = self.notifications.delete_older_than(cutoff).await?;
        let overflow = self.notifications.trim_per_user(self.max_per_user).await?;
        if expired > 0 || overflow > 0 {
            info!(expired, overflow, "Notification cleanup finished");
        }
        Ok((expired, overflow))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use huddle_database::memory::MemoryNotificationStore;
    use huddle_entity::notification::{NewNotification, NotificationPayload};

    use super::*;

    #[tokio::test]
    async fn test_trims_backlog_to_cap() {
        let notifications = Arc::new(MemoryNotificationStore::new());
        let user = Uuid::new_v4();
        for _ in 0..5 {
            notifications
                .insert(&NewNotification {
                    user_id: user,
                    title: "New event".to_string(),
                    body: "U12 Tigers".to_string(),
                    payload: NotificationPayload::NewEvent {
                        event_id: Uuid::new_v4(),
                    },
                })
                .await
                .unwrap();
        }

        let job = NotificationCleanupJob::new(
            Arc::clone(&notifications) as Arc<dyn NotificationStore>,
            30,
            3,
        );
        let (expired, overflow) = job.run().await.unwrap();

        assert_eq!(expired, 0);
        assert_eq!(overflow, 2);
        assert_eq!(notifications.list_for_user(user, 50).await.unwrap().len(), 3);
    }
}
