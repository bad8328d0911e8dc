//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Environment variables prefixed with `HUDDLE_` override
//! file values (e.g. `HUDDLE_DATABASE__URL`).

pub mod app;
pub mod auth;
pub mod chat;
pub mod feed;
pub mod logging;
pub mod mail;
pub mod platform;
pub mod push;
pub mod realtime;
pub mod worker;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::auth::AuthConfig;
use self::chat::ChatConfig;
use self::feed::FeedConfig;
use self::logging::LoggingConfig;
use self::mail::MailConfig;
use self::platform::PlatformConfig;
use self::push::PushConfig;
use self::realtime::RealtimeConfig;
use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Chat settings (history page size).
    #[serde(default)]
    pub chat: ChatConfig,
    /// Calendar feed settings.
    pub feed: FeedConfig,
    /// Push gateway settings.
    pub push: PushConfig,
    /// Outbound mail settings.
    pub mail: MailConfig,
    /// Third-party team platform (OAuth) settings.
    pub platform: PlatformConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Real-time change-feed settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file plus `HUDDLE_*` environment
    /// variable overrides.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("HUDDLE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load the base file plus an environment overlay file, if present.
    pub fn load_layered(base: &str, overlay: &str) -> Result<Self, AppError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(base))
            .add_source(config::File::with_name(overlay).required(false))
            .add_source(config::Environment::with_prefix("HUDDLE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}
