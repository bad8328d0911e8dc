//! Shared value types used across crates.

pub mod mail;
pub mod platform;
pub mod push;
