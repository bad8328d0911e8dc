//! Team schedules: events, platform sync, calendar feed, invites.

pub mod feed;
pub mod invite;
pub mod service;
pub mod sync;

pub use feed::CalendarFeedService;
pub use invite::InviteService;
pub use service::ScheduleService;
pub use sync::PlatformSyncService;
