//! User profile model.
//!
//! Authentication lives with the external identity provider; Huddle
//! stores only the profile fields other users see.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier (matches the identity provider subject).
    pub id: Uuid,
    /// Email address.
    pub email: Option<String>,
    /// Display name shown in chat and friend lists.
    pub display_name: Option<String>,
    /// Profile photo URL.
    pub photo_url: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating or updating a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertUser {
    /// The user ID (identity provider subject).
    pub id: Uuid,
    /// Email address.
    pub email: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Profile photo URL.
    pub photo_url: Option<String>,
}
