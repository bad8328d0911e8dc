//! In-memory store implementations.
//!
//! Same semantics as the PostgreSQL repositories, including uniqueness
//! conflicts, backed by Tokio-mutexed maps. Used by the service test
//! suites and single-node demos.

mod conversation;
mod device;
mod event;
mod feed;
mod friendship;
mod message;
mod notification;
mod reminder;
mod user;

pub use conversation::MemoryConversationStore;
pub use device::MemoryDeviceStore;
pub use event::MemoryEventStore;
pub use feed::MemoryFeedTokenStore;
pub use friendship::MemoryFriendshipStore;
pub use message::MemoryMessageStore;
pub use notification::MemoryNotificationStore;
pub use reminder::MemoryReminderStore;
pub use user::MemoryUserStore;
