//! Recurring job implementations.

pub mod devices;
pub mod notifications;
pub mod reminders;

pub use devices::DeviceCleanupJob;
pub use notifications::NotificationCleanupJob;
pub use reminders::ReminderDispatchJob;
