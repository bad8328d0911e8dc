//! Calendar feed token model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A per-user secret identifying the long-lived calendar feed URL.
///
/// Regenerating the token invalidates the previous URL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedToken {
    /// The owning user.
    pub user_id: Uuid,
    /// Opaque URL-safe secret.
    pub token: String,
    /// When the current token was issued.
    pub created_at: DateTime<Utc>,
}
