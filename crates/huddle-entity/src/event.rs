//! Team event model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// Entered by hand in the app.
    Manual,
    /// Synchronized from the third-party team platform.
    Platform,
}

/// A scheduled team event on a user's calendar.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamEvent {
    /// Unique event identifier.
    pub id: Uuid,
    /// The user whose schedule this event belongs to.
    pub owner_id: Uuid,
    /// Team display name.
    pub team_name: String,
    /// Event title.
    pub title: String,
    /// Venue or location text.
    pub location: Option<String>,
    /// Event start.
    pub starts_at: DateTime<Utc>,
    /// Event end, if known.
    pub ends_at: Option<DateTime<Utc>>,
    /// Where the event came from.
    pub source: EventSource,
    /// Platform-side event identifier, for synced events.
    pub external_id: Option<String>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// When the row was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create or upsert an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeamEvent {
    /// The user whose schedule this event belongs to.
    pub owner_id: Uuid,
    /// Team display name.
    pub team_name: String,
    /// Event title.
    pub title: String,
    /// Venue or location text.
    pub location: Option<String>,
    /// Event start.
    pub starts_at: DateTime<Utc>,
    /// Event end, if known.
    pub ends_at: Option<DateTime<Utc>>,
    /// Where the event came from.
    pub source: EventSource,
    /// Platform-side event identifier, for synced events.
    pub external_id: Option<String>,
}
