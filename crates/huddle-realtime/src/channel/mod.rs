//! Pub/sub channel system.

pub mod channel;
pub mod registry;
pub mod subscription;
pub mod types;
