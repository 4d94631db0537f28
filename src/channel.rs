//! Channel taxonomy and the sender trait

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::notification::Notification;
use crate::urgency::Urgency;

/// Delivery channel for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Push notification (FCM/APNS via the relay gateway)
    Push,
    /// In-app banner/modal, backed by the store itself
    InApp,
    /// Email digest
    Email,
    /// SMS alert, reserved for critical flows
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Push => "push",
            Channel::InApp => "in_app",
            Channel::Email => "email",
            Channel::Sms => "sms",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Channels selected for an urgency level, in send order.
///
/// The table is closed: every urgency maps to a fixed list, no fallback.
pub fn channels_for(urgency: Urgency) -> &'static [Channel] {
    match urgency {
        Urgency::Critical => &[Channel::Push, Channel::InApp, Channel::Email],
        Urgency::High => &[Channel::Push, Channel::InApp],
        Urgency::Medium => &[Channel::InApp],
        Urgency::Low => &[Channel::InApp],
    }
}

/// Outcome of a single channel send
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// Sent (or handed to the external sender)
    Sent,
    /// Skipped with a reason (dry-run, no sender registered)
    Skipped(String),
    /// Send failed; logged, never propagated
    Failed(String),
}

/// A sender for one delivery channel.
///
/// Implementations are best-effort: transport failures are reported through
/// `SendResult::Failed` or an error that the dispatcher folds into one.
pub trait ChannelSender: Send + Sync {
    /// The channel this sender serves
    fn channel(&self) -> Channel;

    /// Send the notification to the user through this channel
    fn send(&self, user_id: &str, notification: &Notification) -> Result<SendResult>;
}
