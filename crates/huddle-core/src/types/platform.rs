//! Value types returned by the third-party team platform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team visible to the authorized platform account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformTeam {
    /// Platform-side team identifier.
    pub id: String,
    /// Team display name.
    pub name: String,
    /// Sport or league label, if the platform provides one.
    pub sport: Option<String>,
}

/// A scheduled event pulled from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Platform-side event identifier.
    pub id: String,
    /// Owning team's platform identifier.
    pub team_id: String,
    /// Event title.
    pub title: String,
    /// Venue or location text.
    pub location: Option<String>,
    /// Event start.
    pub starts_at: DateTime<Utc>,
    /// Event end, if known.
    pub ends_at: Option<DateTime<Utc>>,
}
