//! Cron scheduler for the recurring jobs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{error, info};

use huddle_core::config::worker::WorkerConfig;
use huddle_core::error::AppError;
use huddle_core::result::AppResult;

use crate::jobs::{DeviceCleanupJob, NotificationCleanupJob, ReminderDispatchJob};

/// Daily cleanup at 03:00 UTC.
const CLEANUP_CRON: &str = "0 0 3 * * *";

/// Owns the cron scheduler and the job instances it drives.
pub struct WorkerScheduler {
    scheduler: JobScheduler,
    config: WorkerConfig,
    reminders: Arc<ReminderDispatchJob>,
    notifications: Arc<NotificationCleanupJob>,
    devices: Arc<DeviceCleanupJob>,
}

impl std::fmt::Debug for WorkerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerScheduler").finish()
    }
}

impl WorkerScheduler {
    /// Create a scheduler over the given jobs.
    pub async fn new(
        config: &WorkerConfig,
        reminders: Arc<ReminderDispatchJob>,
        notifications: Arc<NotificationCleanupJob>,
        devices: Arc<DeviceCleanupJob>,
    ) -> AppResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;
        Ok(Self {
            scheduler,
            config: config.clone(),
            reminders,
            notifications,
            devices,
        })
    }

    /// Register every recurring task and start the scheduler.
    pub async fn start(&self) -> AppResult<()> {
        if !self.config.enabled {
            info!("Worker disabled, skipping scheduler start");
            return Ok(());
        }

        self.register_reminder_dispatch().await?;
        self.register_reminder_cleanup().await?;
        self.register_notification_cleanup().await?;
        self.register_device_cleanup().await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;
        info!("Worker scheduler started");
        Ok(())
    }

    /// Shut the scheduler down.
    pub async fn shutdown(&mut self) -> AppResult<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;
        info!("Worker scheduler shut down");
        Ok(())
    }

    async fn register_reminder_dispatch(&self) -> AppResult<()> {
        let job = Arc::clone(&self.reminders);
        let cron = CronJob::new_async(
            self.config.reminder_dispatch_cron.as_str(),
            move |_uuid, _lock| {
                let job = Arc::clone(&job);
                Box::pin(async move {
                    if let Err(e) = job.dispatch().await {
                        error!(error = %e, "Reminder dispatch failed");
                    }
                })
            },
        )
        .map_err(|e| AppError::internal(format!("Failed to create reminder_dispatch: {e}")))?;
        self.add(cron, "reminder_dispatch").await
    }

    async fn register_reminder_cleanup(&self) -> AppResult<()> {
        let job = Arc::clone(&self.reminders);
        let cron = CronJob::new_async(CLEANUP_CRON, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.cleanup().await {
                    error!(error = %e, "Reminder cleanup failed");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create reminder_cleanup: {e}")))?;
        self.add(cron, "reminder_cleanup").await
    }

    async fn register_notification_cleanup(&self) -> AppResult<()> {
        let job = Arc::clone(&self.notifications);
        let cron = CronJob::new_async(CLEANUP_CRON, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    error!(error = %e, "Notification cleanup failed");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create notification_cleanup: {e}")))?;
        self.add(cron, "notification_cleanup").await
    }

    async fn register_device_cleanup(&self) -> AppResult<()> {
        let job = Arc::clone(&self.devices);
        let cron = CronJob::new_async(CLEANUP_CRON, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                if let Err(e) = job.run().await {
                    error!(error = %e, "Device cleanup failed");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create device_cleanup: {e}")))?;
        self.add(cron, "device_cleanup").await
    }

    async fn add(&self, cron: CronJob, name: &str) -> AppResult<()> {
        self.scheduler
            .add(cron)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {name}: {e}")))?;
        info!(job = name, "Registered scheduled job");
        Ok(())
    }
}
