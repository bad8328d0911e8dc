//! Calendar subscription feed configuration.

use serde::{Deserialize, Serialize};

/// Calendar feed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Public base URL for feed links, e.g. `https://huddle.example.com`.
    pub base_url: String,
    /// Calendar name embedded in the iCalendar output.
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,
}

fn default_calendar_name() -> String {
    "Huddle Schedule".to_string()
}
