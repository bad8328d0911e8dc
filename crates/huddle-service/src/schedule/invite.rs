//! Email invites for shared events.

use std::sync::Arc;

use uuid::Uuid;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;
use huddle_core::traits::gateway::Mailer;
use huddle_core::types::mail::OutboundEmail;
use huddle_database::stores::{EventStore, UserStore};
use huddle_entity::event::TeamEvent;

/// Builds and sends transactional event invites.
pub struct InviteService {
    events: Arc<dyn EventStore>,
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
}

impl InviteService {
    /// Creates a new invite service.
    pub fn new(
        events: Arc<dyn EventStore>,
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            events,
            users,
            mailer,
        }
    }

    /// Email an invite for one of the sender's events.
    pub async fn send_invite(&self, sender_id: Uuid, event_id: Uuid, to: &str) -> AppResult<()> {
        if to.trim().is_empty() || !to.contains('@') {
            return Err(AppError::validation("Invalid recipient address"));
        }
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;
        if event.owner_id != sender_id {
            return Err(AppError::authorization("Only the owner can send invites"));
        }

        let sender_name = self
            .users
            .find_by_id(sender_id)
            .await?
            .and_then(|u| u.display_name)
            .unwrap_or_else(|| "A Huddle user".to_string());

        let email = OutboundEmail {
            to: to.trim().to_string(),
            subject: format!("{sender_name} invited you: {}", event.title),
            text_body: text_body(&sender_name, &event),
            html_body: html_body(&sender_name, &event),
        };
        self.mailer.send(&email).await
    }
}

fn when_line(event: &TeamEvent) -> String {
    let start = event.starts_at.format("%Y-%m-%d %H:%M UTC");
    match event.ends_at {
        Some(ends_at) => format!("{start} to {}", ends_at.format("%H:%M UTC")),
        None => start.to_string(),
    }
}

fn text_body(sender_name: &str, event: &TeamEvent) -> String {
    let mut body = format!(
        "{sender_name} invited you to {}.\n\nTeam: {}\nWhen: {}\n",
        event.title,
        event.team_name,
        when_line(event)
    );
    if let Some(location) = &event.location {
        body.push_str(&format!("Where: {location}\n"));
    }
    body
}

fn html_body(sender_name: &str, event: &TeamEvent) -> String {
    let mut body = format!(
        "<p>{} invited you to <strong>{}</strong>.</p>\
         <p>Team: {}<br>When: {}",
        escape_html(sender_name),
        escape_html(&event.title),
        escape_html(&event.team_name),
        when_line(event)
    );
    if let Some(location) = &event.location {
        body.push_str(&format!("<br>Where: {}", escape_html(location)));
    }
    body.push_str("</p>");
    body
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
