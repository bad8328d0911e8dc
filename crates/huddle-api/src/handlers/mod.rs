//! HTTP and WebSocket handlers, organized by domain.

pub mod chat;
pub mod device;
pub mod friend;
pub mod health;
pub mod notification;
pub mod platform;
pub mod reminder;
pub mod schedule;
pub mod user;
pub mod ws;
