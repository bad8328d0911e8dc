//! Calendar subscription feed: secret tokens and iCalendar rendering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::RngExt;
use serde::Serialize;
use uuid::Uuid;

use huddle_core::config::feed::FeedConfig;
use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_database::stores::{EventStore, FeedTokenStore};
use huddle_entity::event::TeamEvent;

/// A user's feed subscription details.
#[derive(Debug, Clone, Serialize)]
pub struct FeedLinks {
    /// The secret token embedded in the URL.
    pub token: String,
    /// HTTPS URL of the feed.
    pub url: String,
    /// `webcal://` variant for one-tap calendar subscription.
    pub webcal_url: String,
}

/// Serves each user's schedule as a long-lived iCalendar feed.
///
/// The URL embeds a per-user secret token; rotating the token
/// invalidates every previously shared URL.
pub struct CalendarFeedService {
    tokens: Arc<dyn FeedTokenStore>,
    events: Arc<dyn EventStore>,
    config: FeedConfig,
}

impl CalendarFeedService {
    /// Creates a new feed service.
    pub fn new(
        tokens: Arc<dyn FeedTokenStore>,
        events: Arc<dyn EventStore>,
        config: &FeedConfig,
    ) -> Self {
        Self {
            tokens,
            events,
            config: config.clone(),
        }
    }

    /// Return the user's feed links, minting a token on first use.
    pub async fn links(&self, user_id: Uuid) -> AppResult<FeedLinks> {
        let token = match self.tokens.find_by_user(user_id).await? {
            Some(existing) => existing,
            None => self.tokens.replace(user_id, &generate_token()).await?,
        };
        Ok(self.links_for(&token.token))
    }

    /// Mint a fresh token, invalidating the previous URL.
    pub async fn rotate(&self, user_id: Uuid) -> AppResult<FeedLinks> {
        let token = self.tokens.replace(user_id, &generate_token()).await?;
        Ok(self.links_for(&token.token))
    }

    /// Render the iCalendar document for a feed token.
    pub async fn render(&self, token: &str) -> AppResult<String> {
        let owner = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Unknown feed token"))?;
        let events = self.events.list_for_owner(owner.user_id).await?;
        Ok(self.render_calendar(&events))
    }

    fn links_for(&self, token: &str) -> FeedLinks {
        let url = format!("{}/feed/{token}.ics", self.config.base_url.trim_end_matches('/'));
        let webcal_url = match url.split_once("://") {
            Some((_, rest)) => format!("webcal://{rest}"),
            None => url.clone(),
        };
        FeedLinks {
            token: token.to_string(),
            url,
            webcal_url,
        }
    }

    fn render_calendar(&self, events: &[TeamEvent]) -> String {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            "PRODID:-//Huddle//Schedule Feed//EN".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            format!("X-WR-CALNAME:{}", escape_text(&self.config.calendar_name)),
        ];
        for event in events {
            lines.push("BEGIN:VEVENT".to_string());
            lines.push(format!("UID:{}@huddle", event.id));
            lines.push(format!("DTSTAMP:{}", format_utc(event.updated_at)));
            lines.push(format!("DTSTART:{}", format_utc(event.starts_at)));
            if let Some(ends_at) = event.ends_at {
                lines.push(format!("DTEND:{}", format_utc(ends_at)));
            }
            lines.push(format!("SUMMARY:{}", escape_text(&event.title)));
            if let Some(location) = &event.location {
                lines.push(format!("LOCATION:{}", escape_text(location)));
            }
            lines.push(format!("DESCRIPTION:{}", escape_text(&event.team_name)));
            lines.push("END:VEVENT".to_string());
        }
        lines.push("END:VCALENDAR".to_string());
        // RFC 5545 requires CRLF line endings.
        let mut out = lines.join("\r\n");
        out.push_str("\r\n");
        out
    }
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    hex::encode(bytes)
}

fn format_utc(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use huddle_database::memory::{MemoryEventStore, MemoryFeedTokenStore};
    use huddle_entity::event::{EventSource, NewTeamEvent};

    use super::*;

    fn service(events: Arc<MemoryEventStore>) -> CalendarFeedService {
        CalendarFeedService::new(
            Arc::new(MemoryFeedTokenStore::new()),
            events,
            &FeedConfig {
                base_url: "https://huddle.example.com".to_string(),
                calendar_name: "Huddle Schedule".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_links_are_stable_until_rotated() {
        let service = service(Arc::new(MemoryEventStore::new()));
        let user = Uuid::new_v4();

        let first = service.links(user).await.unwrap();
        let second = service.links(user).await.unwrap();
        assert_eq!(first.token, second.token);
        assert!(first.url.ends_with(&format!("/feed/{}.ics", first.token)));
        assert!(first.webcal_url.starts_with("webcal://"));

        let rotated = service.rotate(user).await.unwrap();
        assert_ne!(rotated.token, first.token);
    }

    #[tokio::test]
    async fn test_rotation_invalidates_old_token() {
        let service = service(Arc::new(MemoryEventStore::new()));
        let user = Uuid::new_v4();

        let old = service.links(user).await.unwrap();
        service.rotate(user).await.unwrap();

        let err = service.render(&old.token).await.unwrap_err();
        assert_eq!(err.kind, huddle_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_render_escapes_and_formats() {
        let events = Arc::new(MemoryEventStore::new());
        let service = service(Arc::clone(&events));
        let user = Uuid::new_v4();

        let starts_at = Utc.with_ymd_and_hms(2026, 9, 5, 14, 30, 0).single().unwrap();
        events
            .insert(&NewTeamEvent {
                owner_id: user,
                team_name: "U12 Tigers".to_string(),
                title: "Match; home, away".to_string(),
                location: Some("East field".to_string()),
                starts_at,
                ends_at: Some(starts_at + Duration::hours(2)),
                source: EventSource::Manual,
                external_id: None,
            })
            .await
            .unwrap();

        let links = service.links(user).await.unwrap();
        let ics = service.render(&links.token).await.unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.contains("SUMMARY:Match\\; home\\, away"));
        assert!(ics.contains("DTSTART:20260905T143000Z"));
        assert!(ics.contains("DTEND:20260905T163000Z"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }
}
