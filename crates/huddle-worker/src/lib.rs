//! Scheduled background jobs for Huddle.
//!
//! The scheduler runs three recurring tasks: the due-reminder dispatch
//! sweep, notification retention cleanup, and stale device pruning.

pub mod jobs;
pub mod scheduler;

pub use scheduler::WorkerScheduler;
