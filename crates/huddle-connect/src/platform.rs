//! Team platform API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use huddle_core::config::platform::PlatformConfig;
use huddle_core::error::{AppError, ErrorKind};
use huddle_core::result::AppResult;
use huddle_core::traits::gateway::TeamPlatform;
use huddle_core::types::platform::{PlatformEvent, PlatformTeam};

use crate::http::{status_error, transport_error};

#[derive(Debug, Deserialize)]
struct TeamDto {
    id: String,
    name: String,
    #[serde(default)]
    sport: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventDto {
    id: String,
    team_id: String,
    title: String,
    #[serde(default)]
    location: Option<String>,
    starts_at: DateTime<Utc>,
    #[serde(default)]
    ends_at: Option<DateTime<Utc>>,
}

/// Pulls team and event lists from the platform REST API.
pub struct TeamPlatformClient {
    client: reqwest::Client,
    base_url: String,
}

impl TeamPlatformClient {
    /// Build a client from configuration.
    pub fn new(config: &PlatformConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Platform client", e))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        access_token: &str,
        path: &str,
    ) -> AppResult<T> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| transport_error("platform.get", e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::new(
                ErrorKind::OAuth,
                "Platform access token rejected",
            ));
        }
        if !status.is_success() {
            return Err(status_error("platform.get", ErrorKind::ExternalService, status));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Serialization, "Platform response", e))
    }
}

#[async_trait]
impl TeamPlatform for TeamPlatformClient {
    async fn fetch_teams(&self, access_token: &str) -> AppResult<Vec<PlatformTeam>> {
        let teams: Vec<TeamDto> = self.get_json(access_token, "/v1/teams").await?;
        Ok(teams
            .into_iter()
            .map(|t| PlatformTeam {
                id: t.id,
                name: t.name,
                sport: t.sport,
            })
            .collect())
    }

    async fn fetch_events(
        &self,
        access_token: &str,
        team_id: &str,
    ) -> AppResult<Vec<PlatformEvent>> {
        let path = format!("/v1/teams/{team_id}/events");
        let events: Vec<EventDto> = self.get_json(access_token, &path).await?;
        Ok(events
            .into_iter()
            .map(|e| PlatformEvent {
                id: e.id,
                team_id: e.team_id,
                title: e.title,
                location: e.location,
                starts_at: e.starts_at,
                ends_at: e.ends_at,
            })
            .collect())
    }
}
