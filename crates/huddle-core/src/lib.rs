//! # huddle-core
//!
//! Core crate for Huddle. Contains configuration schemas, the unified
//! error system, gateway traits for external collaborators (push,
//! mail, team platform, on-device scheduling), shared value types,
//! and the bounded-retry helper.
//!
//! This crate has **no** internal dependencies on other Huddle crates.

pub mod config;
pub mod error;
pub mod result;
pub mod retry;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
