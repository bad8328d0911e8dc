//! Gateway traits for external collaborators.
//!
//! Push delivery, transactional mail, the third-party team platform,
//! and the on-device notification scheduler are all external systems.
//! These traits are their interfaces; concrete HTTP clients live in
//! `huddle-connect`, and tests substitute recording fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::mail::OutboundEmail;
use crate::types::platform::{PlatformEvent, PlatformTeam};
use crate::types::push::PushMessage;

/// Delivers push notifications to a device by its registration token.
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Send one push message to one device token.
    async fn send(&self, token: &str, message: &PushMessage) -> AppResult<()>;
}

/// Sends transactional email through an outbound provider.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a single email with plain-text and HTML bodies.
    async fn send(&self, message: &OutboundEmail) -> AppResult<()>;
}

/// Schedules or cancels notifications on the user's device.
///
/// Delivery is server-authoritative; this interface exists only to
/// cancel notifications that an older client build scheduled locally.
#[async_trait]
pub trait LocalNotificationScheduler: Send + Sync {
    /// Schedule a device-local notification for a future instant.
    async fn schedule(
        &self,
        local_id: i32,
        title: &str,
        body: &str,
        at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Cancel a previously scheduled device-local notification.
    async fn cancel(&self, local_id: i32) -> AppResult<()>;
}

/// Pulls team and event lists from the third-party sports platform.
#[async_trait]
pub trait TeamPlatform: Send + Sync {
    /// Fetch the teams visible to the authorized account.
    async fn fetch_teams(&self, access_token: &str) -> AppResult<Vec<PlatformTeam>>;

    /// Fetch the events for one team.
    async fn fetch_events(&self, access_token: &str, team_id: &str)
    -> AppResult<Vec<PlatformEvent>>;
}
