//! Scheduled event-reminder model and status lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a scheduled reminder row.
///
/// `pending -> sent` is the normal server-push path. `scheduled` only
/// appears on rows created by older client builds that scheduled a
/// device-local notification; the reconciler still drives those to
/// `sent` or removal. `cancelled` is set by the backend when the
/// underlying event disappears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reminder_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    /// Awaiting delivery by the server push sweep.
    Pending,
    /// A legacy client scheduled a device-local notification.
    Scheduled,
    /// The underlying event was deleted; clean up and remove.
    Cancelled,
    /// Delivered (or assumed delivered); bookkeeping only.
    Sent,
}

impl ReminderStatus {
    /// Statuses still eligible for delivery.
    pub fn deliverable() -> &'static [ReminderStatus] {
        &[Self::Pending, Self::Scheduled]
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Sent | Self::Cancelled)
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Cancelled => "cancelled",
            Self::Sent => "sent",
        };
        write!(f, "{s}")
    }
}

/// A scheduled reminder for an upcoming event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventReminder {
    /// Unique reminder identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// The event this reminder announces.
    pub event_id: Uuid,
    /// Push/notification title.
    pub title: String,
    /// Push/notification body.
    pub body: String,
    /// When the reminder should fire.
    pub trigger_time: DateTime<Utc>,
    /// Current lifecycle status.
    pub status: ReminderStatus,
    /// Device-local notification ID, for rows a legacy client scheduled.
    pub local_notification_id: Option<i32>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

impl EventReminder {
    /// Whether the trigger time has passed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.trigger_time <= now
    }
}

/// Data required to create a reminder row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEventReminder {
    /// The recipient user.
    pub user_id: Uuid,
    /// The event this reminder announces.
    pub event_id: Uuid,
    /// Push/notification title.
    pub title: String,
    /// Push/notification body.
    pub body: String,
    /// When the reminder should fire.
    pub trigger_time: DateTime<Utc>,
}
