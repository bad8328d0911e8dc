//! # huddle-realtime
//!
//! Real-time change feed for Huddle. Provides:
//!
//! - Typed pub/sub channels (per-user and per-conversation)
//! - A hub fanning out row-change events to subscribed connections
//! - Notification dispatch: persist, publish, and best-effort push
//! - Time-window deduplication of rapid push events

pub mod change;
pub mod channel;
pub mod dedup;
pub mod dispatcher;
pub mod hub;
pub mod message;

pub use change::{ChangeEvent, ChangeOp, ChangeRecord};
pub use channel::registry::ChannelRegistry;
pub use channel::types::ChannelType;
pub use dispatcher::NotificationDispatcher;
pub use hub::{ChangeFeedHub, ConnectionId};
