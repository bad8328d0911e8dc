//! Scheduled event reminders.

pub mod reconciler;

pub use reconciler::ReminderReconciler;
