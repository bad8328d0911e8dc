//! # huddle-service
//!
//! Business logic service layer for Huddle. Each service orchestrates
//! store traits, the change-feed hub, and outbound gateways to
//! implement application-level use cases.
//!
//! Services follow constructor injection; all dependencies are
//! provided at construction time via `Arc` references.

pub mod chat;
pub mod context;
pub mod device;
pub mod friend;
pub mod notification;
pub mod reminder;
pub mod schedule;

pub use chat::{ChatService, ChatSession, MessageTimeline};
pub use context::RequestContext;
pub use device::DeviceRegistrar;
pub use friend::FriendService;
pub use notification::NotificationService;
pub use reminder::ReminderReconciler;
pub use schedule::{CalendarFeedService, InviteService, PlatformSyncService, ScheduleService};
