//! In-app channel - backed by the store itself

use anyhow::Result;
use tracing::debug;

use crate::channel::{Channel, ChannelSender, SendResult};
use crate::notification::Notification;

/// In-app delivery is a no-op send: the notification is already in the store
/// by the time the dispatcher runs, and the app surfaces it from there.
pub struct InAppSender;

impl InAppSender {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InAppSender {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSender for InAppSender {
    fn channel(&self) -> Channel {
        Channel::InApp
    }

    fn send(&self, user_id: &str, notification: &Notification) -> Result<SendResult> {
        debug!(
            channel = "in_app",
            user_id = %user_id,
            id = %notification.id,
            "In-app notification available"
        );
        Ok(SendResult::Sent)
    }
}
