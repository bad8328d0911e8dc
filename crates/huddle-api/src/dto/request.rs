//! Request body definitions.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use huddle_entity::device::DevicePlatform;
use huddle_entity::friendship::FriendRole;

/// POST /api/conversations
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveConversationRequest {
    /// The other participant.
    pub other_id: Uuid,
}

/// POST /api/conversations/{id}/messages
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    /// Message text.
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
}

/// POST /api/friends/requests
#[derive(Debug, Deserialize, Validate)]
pub struct SendFriendRequestRequest {
    /// The user to befriend.
    pub requested_id: Uuid,
    /// Access the requester grants over their schedule.
    pub role: FriendRole,
}

/// POST /api/devices
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterDeviceRequest {
    /// Stable device identifier.
    #[validate(length(min = 1, max = 128))]
    pub device_id: String,
    /// Human-readable device name.
    pub device_name: Option<String>,
    /// Device platform.
    pub platform: DevicePlatform,
    /// Provider push token.
    #[validate(length(min = 1, max = 512))]
    pub push_token: String,
}

/// DELETE /api/devices
#[derive(Debug, Deserialize, Validate)]
pub struct UnregisterDeviceRequest {
    /// The push token to remove.
    #[validate(length(min = 1, max = 512))]
    pub push_token: String,
}

/// POST /api/reminders
#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleReminderRequest {
    /// The event the reminder is for.
    pub event_id: Uuid,
    /// Notification title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Notification body.
    #[validate(length(min = 1, max = 500))]
    pub body: String,
    /// When to deliver.
    pub trigger_time: DateTime<Utc>,
}

/// POST /api/events
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    /// Team display name.
    #[validate(length(min = 1, max = 120))]
    pub team_name: String,
    /// Event title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Venue or location text.
    pub location: Option<String>,
    /// Event start.
    pub starts_at: DateTime<Utc>,
    /// Event end, if known.
    pub ends_at: Option<DateTime<Utc>>,
}

/// POST /api/events/{id}/invite
#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    /// Recipient address.
    #[validate(email)]
    pub email: String,
}

/// PUT /api/users/me
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Email address.
    #[validate(email)]
    pub email: Option<String>,
    /// Display name.
    #[validate(length(min = 1, max = 80))]
    pub display_name: Option<String>,
    /// Profile photo URL.
    #[validate(length(max = 2048))]
    pub photo_url: Option<String>,
}

/// POST /api/platform/callback
#[derive(Debug, Deserialize, Validate)]
pub struct PlatformCallbackRequest {
    /// The opaque state from the authorize URL.
    #[validate(length(min = 1))]
    pub state: String,
    /// The provider's authorization code.
    #[validate(length(min = 1))]
    pub code: String,
}
