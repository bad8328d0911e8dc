//! HTTP push gateway client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use huddle_core::config::push::PushConfig;
use huddle_core::error::{AppError, ErrorKind};
use huddle_core::result::AppResult;
use huddle_core::traits::gateway::PushGateway;
use huddle_core::types::push::PushMessage;

use crate::http::{status_error, transport_error};

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    token: &'a str,
    notification: PushNotification<'a>,
    data: &'a serde_json::Value,
}

#[derive(Debug, Serialize)]
struct PushNotification<'a> {
    title: &'a str,
    body: &'a str,
}

/// Delivers notifications through an FCM-style HTTP endpoint.
///
/// Retries live with the caller; this client makes exactly one attempt
/// and classifies failures as transient or hard.
pub struct PushClient {
    client: reqwest::Client,
    config: PushConfig,
}

impl PushClient {
    /// Build a client from configuration.
    pub fn new(config: &PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Push client", e))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl PushGateway for PushClient {
    async fn send(&self, token: &str, message: &PushMessage) -> AppResult<()> {
        if !self.config.enabled {
            debug!("Push delivery disabled, dropping message");
            return Ok(());
        }

        let request = PushRequest {
            token,
            notification: PushNotification {
                title: &message.title,
                body: &message.body,
            },
            data: &message.data,
        };
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error("push.send", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error("push.send", ErrorKind::Push, status));
        }
        Ok(())
    }
}
