//! Push message value type.

use serde::{Deserialize, Serialize};

/// A push notification payload handed to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushMessage {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Structured data payload delivered alongside the notification.
    ///
    /// Carries the tagged notification payload so the client's tap
    /// handler can branch on kind for in-app navigation.
    pub data: serde_json::Value,
}

impl PushMessage {
    /// Create a new push message.
    pub fn new(title: impl Into<String>, body: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data,
        }
    }
}
