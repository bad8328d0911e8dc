//! Due-reminder dispatch and terminal-row retention.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use huddle_core::result::AppResult;
use huddle_database::stores::ReminderStore;
use huddle_service::ReminderReconciler;

/// Pushes due reminders and prunes rows that finished long ago.
pub struct ReminderDispatchJob {
    reconciler: Arc<ReminderReconciler>,
    reminders: Arc<dyn ReminderStore>,
    retention_days: i64,
}

impl ReminderDispatchJob {
    /// Creates the job.
    pub fn new(
        reconciler: Arc<ReminderReconciler>,
        reminders: Arc<dyn ReminderStore>,
        retention_days: i64,
    ) -> Self {
        Self {
            reconciler,
            reminders,
            retention_days,
        }
    }

    /// Push every due reminder. Returns the number sent.
    pub async fn dispatch(&self) -> AppResult<u64> {
        self.reconciler.dispatch_due(Utc::now()).await
    }

    /// Delete sent and cancelled rows older than the retention window.
    pub async fn cleanup(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - Duration::days(self.retention_days);
        let removed = self.reminders.delete_finished_before(cutoff).await?;
        if removed > 0 {
            info!(removed, "Pruned finished reminders");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use huddle_core::config::push::PushConfig;
    use huddle_core::config::realtime::RealtimeConfig;
    use huddle_core::traits::gateway::{LocalNotificationScheduler, PushGateway};
    use huddle_core::types::push::PushMessage;
    use huddle_database::memory::{
        MemoryDeviceStore, MemoryNotificationStore, MemoryReminderStore,
    };
    use huddle_entity::reminder::{NewEventReminder, ReminderStatus};
    use huddle_realtime::dispatcher::NotificationDispatcher;
    use huddle_realtime::hub::ChangeFeedHub;

    use super::*;

    struct NullPush;

    #[async_trait::async_trait]
    impl PushGateway for NullPush {
        async fn send(&self, _token: &str, _message: &PushMessage) -> AppResult<()> {
            Ok(())
        }
    }

    struct NullScheduler;

    #[async_trait::async_trait]
    impl LocalNotificationScheduler for NullScheduler {
        async fn schedule(
            &self,
            _local_id: i32,
            _title: &str,
            _body: &str,
            _at: chrono::DateTime<Utc>,
        ) -> AppResult<()> {
            Ok(())
        }

        async fn cancel(&self, _local_id: i32) -> AppResult<()> {
            Ok(())
        }
    }

    fn job(reminders: Arc<MemoryReminderStore>) -> ReminderDispatchJob {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::new(MemoryNotificationStore::new()),
            Arc::new(MemoryDeviceStore::new()),
            Arc::new(NullPush),
            Arc::new(ChangeFeedHub::new(&RealtimeConfig::default())),
            &PushConfig {
                enabled: false,
                endpoint: String::new(),
                api_key: String::new(),
                timeout_seconds: 1,
                retry_attempts: 1,
                retry_base_delay_ms: 1,
            },
            &RealtimeConfig::default(),
        ));
        let reconciler = Arc::new(ReminderReconciler::new(
            Arc::clone(&reminders) as Arc<dyn ReminderStore>,
            dispatcher,
            Arc::new(NullScheduler),
        ));
        ReminderDispatchJob::new(reconciler, reminders, 7)
    }

    #[tokio::test]
    async fn test_dispatch_sends_due_rows() {
        let reminders = Arc::new(MemoryReminderStore::new());
        let job = job(Arc::clone(&reminders));
        let row = reminders
            .insert(&NewEventReminder {
                user_id: Uuid::new_v4(),
                event_id: Uuid::new_v4(),
                title: "Game day".to_string(),
                body: "Kickoff soon".to_string(),
                trigger_time: Utc::now() - Duration::minutes(2),
            })
            .await
            .unwrap();

        assert_eq!(job.dispatch().await.unwrap(), 1);
        assert_eq!(
            reminders.find_by_id(row.id).await.unwrap().unwrap().status,
            ReminderStatus::Sent
        );
    }

    #[tokio::test]
    async fn test_cleanup_keeps_recent_rows() {
        let reminders = Arc::new(MemoryReminderStore::new());
        let job = job(Arc::clone(&reminders));
        reminders
            .insert(&NewEventReminder {
                user_id: Uuid::new_v4(),
                event_id: Uuid::new_v4(),
                title: "Game day".to_string(),
                body: "Kickoff soon".to_string(),
                trigger_time: Utc::now() - Duration::minutes(2),
            })
            .await
            .unwrap();
        job.dispatch().await.unwrap();

        // Just sent, inside the retention window.
        assert_eq!(job.cleanup().await.unwrap(), 0);
    }
}
