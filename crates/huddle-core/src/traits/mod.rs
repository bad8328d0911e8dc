//! Traits for external collaborators.

pub mod gateway;

pub use gateway::{LocalNotificationScheduler, Mailer, PushGateway, TeamPlatform};
