//! PostgreSQL repository implementations of the store traits.

pub mod conversation;
pub mod device;
pub mod event;
pub mod feed;
pub mod friendship;
pub mod message;
pub mod notification;
pub mod reminder;
pub mod user;

use huddle_core::error::{AppError, ErrorKind};

/// Map a sqlx error to an [`AppError`], surfacing unique-constraint
/// violations as `Conflict` so callers can recover (conversation
/// resolution, device registration).
pub(crate) fn db_err(context: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return AppError::with_source(
                ErrorKind::Conflict,
                format!("{context}: unique constraint violated"),
                e,
            );
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), e)
}
