//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the reminder dispatch sweep.
    #[serde(default = "default_reminder_cron")]
    pub reminder_dispatch_cron: String,
    /// Days after which sent/orphaned reminders are deleted.
    #[serde(default = "default_reminder_retention")]
    pub reminder_retention_days: i64,
    /// Days after which notifications are deleted.
    #[serde(default = "default_notification_retention")]
    pub notification_retention_days: i64,
    /// Maximum stored notifications per user.
    #[serde(default = "default_max_notifications")]
    pub max_notifications_per_user: i64,
    /// Days of push-token inactivity before a device row is pruned.
    #[serde(default = "default_device_retention")]
    pub device_inactive_days: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reminder_dispatch_cron: default_reminder_cron(),
            reminder_retention_days: default_reminder_retention(),
            notification_retention_days: default_notification_retention(),
            max_notifications_per_user: default_max_notifications(),
            device_inactive_days: default_device_retention(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_reminder_cron() -> String {
    // Every minute
    "0 * * * * *".to_string()
}

fn default_reminder_retention() -> i64 {
    7
}

fn default_notification_retention() -> i64 {
    30
}

fn default_max_notifications() -> i64 {
    200
}

fn default_device_retention() -> i64 {
    90
}
