//! Relay gateway sender for push, email and sms
//!
//! All external transports go through one HTTP gateway; the sender only
//! guarantees that the call is made with the right payload. Transport
//! failures and timeouts are folded into `SendResult::Failed` and logged,
//! never propagated and never retried.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use crate::channel::{Channel, ChannelSender, SendResult};
use crate::config::RelayConfig;
use crate::notification::{ActionButton, Notification};

/// Payload posted to the relay gateway
#[derive(Debug, Serialize)]
struct RelayPayload<'a> {
    channel: &'static str,
    user_id: &'a str,
    notification_id: &'a str,
    title: &'a str,
    message: &'a str,
    urgency: &'static str,
    agent_name: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    action_buttons: &'a [ActionButton],
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    data: &'a serde_json::Map<String, serde_json::Value>,
}

/// Gateway response
#[derive(Debug, Deserialize)]
struct RelayResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// One sender instance per external channel, sharing the gateway config
pub struct RelaySender {
    channel: Channel,
    client: Client,
    config: RelayConfig,
}

impl RelaySender {
    pub fn new(channel: Channel, config: RelayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            channel,
            client,
            config,
        })
    }

    pub fn push(config: RelayConfig) -> Result<Self> {
        Self::new(Channel::Push, config)
    }

    pub fn email(config: RelayConfig) -> Result<Self> {
        Self::new(Channel::Email, config)
    }

    pub fn sms(config: RelayConfig) -> Result<Self> {
        Self::new(Channel::Sms, config)
    }

    fn payload<'a>(&self, user_id: &'a str, notification: &'a Notification) -> RelayPayload<'a> {
        RelayPayload {
            channel: self.channel.as_str(),
            user_id,
            notification_id: &notification.id,
            title: &notification.title,
            message: &notification.message,
            urgency: notification.urgency.as_str(),
            agent_name: &notification.agent_name,
            action_buttons: &notification.action_buttons,
            data: &notification.data,
        }
    }
}

impl ChannelSender for RelaySender {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn send(&self, user_id: &str, notification: &Notification) -> Result<SendResult> {
        let url = format!("{}/hooks/notify", self.config.gateway_url);
        let mut request = self.client.post(&url).json(&self.payload(user_id, notification));
        if !self.config.token.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.config.token));
        }

        let response = match request.send() {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    channel = %self.channel,
                    id = %notification.id,
                    error = %e,
                    "Relay send failed"
                );
                return Ok(SendResult::Failed(e.to_string()));
            }
        };

        match response.json::<RelayResponse>() {
            Ok(body) if body.ok => {
                info!(
                    channel = %self.channel,
                    user_id = %user_id,
                    id = %notification.id,
                    "Notification relayed"
                );
                Ok(SendResult::Sent)
            }
            Ok(body) => {
                let reason = body.error.unwrap_or_else(|| "unknown gateway error".to_string());
                warn!(channel = %self.channel, error = %reason, "Relay rejected notification");
                Ok(SendResult::Failed(reason))
            }
            Err(e) => {
                warn!(channel = %self.channel, error = %e, "Invalid relay response");
                Ok(SendResult::Failed(e.to_string()))
            }
        }
    }
}
