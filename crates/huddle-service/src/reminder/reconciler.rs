//! Reminder state reconciliation and due-reminder dispatch.
//!
//! Delivery is server-authoritative: the worker's dispatch job pushes
//! due reminders and marks them `sent`. The per-user sweep runs at
//! session start and again on realtime change events; both paths call
//! the same guarded transition, so a row is handled exactly once no
//! matter which path reaches it first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use huddle_core::result::AppResult;
use huddle_core::traits::gateway::LocalNotificationScheduler;
use huddle_core::types::push::PushMessage;
use huddle_database::stores::ReminderStore;
use huddle_entity::reminder::{EventReminder, NewEventReminder, ReminderStatus};
use huddle_realtime::change::{ChangeEvent, ChangeOp, ChangeRecord};
use huddle_realtime::dispatcher::NotificationDispatcher;

/// What a sweep did to the user's reminder rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Past-due rows marked `sent`.
    pub marked_sent: u64,
    /// Cancelled rows cleaned up and deleted.
    pub cleaned: u64,
}

/// Drives reminder rows through their lifecycle.
pub struct ReminderReconciler {
    reminders: Arc<dyn ReminderStore>,
    dispatcher: Arc<NotificationDispatcher>,
    local_scheduler: Arc<dyn LocalNotificationScheduler>,
}

impl ReminderReconciler {
    /// Creates a new reconciler.
    pub fn new(
        reminders: Arc<dyn ReminderStore>,
        dispatcher: Arc<NotificationDispatcher>,
        local_scheduler: Arc<dyn LocalNotificationScheduler>,
    ) -> Self {
        Self {
            reminders,
            dispatcher,
            local_scheduler,
        }
    }

    /// Create a pending reminder row.
    pub async fn schedule(&self, new: NewEventReminder) -> AppResult<EventReminder> {
        let stored = self.reminders.insert(&new).await?;
        self.dispatcher
            .publish(ChangeEvent::insert(ChangeRecord::EventReminder(
                stored.clone(),
            )));
        Ok(stored)
    }

    /// List a user's still-deliverable reminders.
    pub async fn upcoming(&self, user_id: Uuid) -> AppResult<Vec<EventReminder>> {
        self.reminders
            .list_in_status(user_id, ReminderStatus::deliverable())
            .await
    }

    /// Mark all deliverable reminders for an event cancelled.
    ///
    /// The rows stay until a sweep or change event cleans them up, so
    /// clients holding legacy local notifications get to cancel them.
    pub async fn cancel_for_event(&self, event_id: Uuid) -> AppResult<u64> {
        self.reminders.cancel_for_event(event_id).await
    }

    /// Session-start sweep over one user's non-terminal rows.
    pub async fn sweep(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<SweepReport> {
        let rows = self
            .reminders
            .list_in_status(user_id, &[
                ReminderStatus::Pending,
                ReminderStatus::Scheduled,
                ReminderStatus::Cancelled,
            ])
            .await?;

        let mut report = SweepReport::default();
        for reminder in rows {
            match self.reconcile_row(&reminder, now).await? {
                RowOutcome::MarkedSent => report.marked_sent += 1,
                RowOutcome::Cleaned => report.cleaned += 1,
                RowOutcome::Untouched => {}
            }
        }
        Ok(report)
    }

    /// Incremental path: reconcile a reminder that changed on the feed.
    pub async fn apply_change(&self, event: &ChangeEvent, now: DateTime<Utc>) -> AppResult<()> {
        if let ChangeRecord::EventReminder(reminder) = &event.record {
            if event.op != ChangeOp::Delete {
                self.reconcile_row(reminder, now).await?;
            }
        }
        Ok(())
    }

    /// Worker path: push every due reminder and mark it `sent`.
    ///
    /// The guarded transition claims the row before the push, so two
    /// overlapping dispatch runs never double-send.
    pub async fn dispatch_due(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let due = self.reminders.due_before(now).await?;
        let mut sent = 0u64;

        for reminder in due {
            let claimed = self
                .reminders
                .set_status(
                    reminder.id,
                    ReminderStatus::deliverable(),
                    ReminderStatus::Sent,
                )
                .await?;
            if !claimed {
                continue;
            }

            let message = PushMessage::new(
                reminder.title.clone(),
                reminder.body.clone(),
                json!({ "event_id": reminder.event_id }),
            );
            self.dispatcher
                .push_to_devices(reminder.user_id, &message)
                .await;

            let mut updated = reminder.clone();
            updated.status = ReminderStatus::Sent;
            self.dispatcher
                .publish(ChangeEvent::update(ChangeRecord::EventReminder(updated)));
            sent += 1;
        }

        if sent > 0 {
            info!(count = sent, "Dispatched due reminders");
        }
        Ok(sent)
    }

    async fn reconcile_row(
        &self,
        reminder: &EventReminder,
        now: DateTime<Utc>,
    ) -> AppResult<RowOutcome> {
        match reminder.status {
            ReminderStatus::Cancelled => {
                if let Some(local_id) = reminder.local_notification_id {
                    if let Err(e) = self.local_scheduler.cancel(local_id).await {
                        warn!(
                            reminder_id = %reminder.id,
                            local_id = local_id,
                            error = %e,
                            "Failed to cancel device-local notification"
                        );
                    }
                }
                self.reminders.delete(reminder.id).await?;
                self.dispatcher
                    .publish(ChangeEvent::delete(ChangeRecord::EventReminder(
                        reminder.clone(),
                    )));
                Ok(RowOutcome::Cleaned)
            }
            ReminderStatus::Pending | ReminderStatus::Scheduled if reminder.is_due(now) => {
                // The banner moment has passed; record delivery without
                // a late push.
                let transitioned = self
                    .reminders
                    .set_status(
                        reminder.id,
                        ReminderStatus::deliverable(),
                        ReminderStatus::Sent,
                    )
                    .await?;
                if transitioned {
                    Ok(RowOutcome::MarkedSent)
                } else {
                    Ok(RowOutcome::Untouched)
                }
            }
            _ => Ok(RowOutcome::Untouched),
        }
    }
}

enum RowOutcome {
    MarkedSent,
    Cleaned,
    Untouched,
}
