//! Friend request and friendship lifecycle.

pub mod service;

pub use service::FriendService;
