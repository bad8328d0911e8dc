//! Transactional mail client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use huddle_core::config::mail::MailConfig;
use huddle_core::error::{AppError, ErrorKind};
use huddle_core::result::AppResult;
use huddle_core::traits::gateway::Mailer;
use huddle_core::types::mail::OutboundEmail;

use crate::http::{status_error, transport_error};

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Sends email through an HTTP mail provider.
pub struct MailClient {
    client: reqwest::Client,
    config: MailConfig,
}

impl MailClient {
    /// Build a client from configuration.
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Mail client", e))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Mailer for MailClient {
    async fn send(&self, message: &OutboundEmail) -> AppResult<()> {
        if !self.config.enabled {
            debug!(to = %message.to, "Outbound mail disabled, dropping message");
            return Ok(());
        }

        let request = SendEmailRequest {
            from: &self.config.from_address,
            to: &message.to,
            subject: &message.subject,
            text: &message.text_body,
            html: &message.html_body,
        };
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("mail.send", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error("mail.send", ErrorKind::Mail, status));
        }
        info!(to = %message.to, "Sent transactional email");
        Ok(())
    }
}
