//! Device / push-token registration model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The platform a device runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "device_platform", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    /// Apple devices.
    Ios,
    /// Android devices.
    Android,
    /// Browser push.
    Web,
}

impl DevicePlatform {
    /// Return the platform as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        }
    }
}

impl fmt::Display for DevicePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DevicePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "web" => Ok(Self::Web),
            other => Err(format!("unknown device platform: {other}")),
        }
    }
}

/// A registered device holding one current push token.
///
/// Keyed by (user_id, push_token) for dedup. The device identifier may
/// change across OS upgrades while the token stays stable, or vice
/// versa; the registrar reconciles both cases to exactly one row per
/// currently-valid token per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    /// Unique row identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: Uuid,
    /// Platform-reported device identifier.
    pub device_id: String,
    /// Human-readable device name.
    pub device_name: Option<String>,
    /// Device platform.
    pub platform: DevicePlatform,
    /// Current push registration token.
    pub push_token: String,
    /// Last time this device checked in.
    pub last_active: DateTime<Utc>,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to register a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDevice {
    /// The owning user.
    pub user_id: Uuid,
    /// Platform-reported device identifier.
    pub device_id: String,
    /// Human-readable device name.
    pub device_name: Option<String>,
    /// Device platform.
    pub platform: DevicePlatform,
    /// Push registration token.
    pub push_token: String,
}
