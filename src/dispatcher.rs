//! Delivery dispatcher - fans a notification out through its channels

use std::sync::Arc;
use tracing::warn;

use crate::channel::{Channel, ChannelSender, SendResult};
use crate::notification::Notification;

/// Holds the registered senders and performs best-effort fan-out.
///
/// Each channel send is independent: a failure in one channel never prevents
/// the others from being attempted, and nothing is rolled back.
pub struct DeliveryDispatcher {
    senders: Vec<Arc<dyn ChannelSender>>,
    dry_run: bool,
}

impl DeliveryDispatcher {
    pub fn new() -> Self {
        Self {
            senders: Vec::new(),
            dry_run: false,
        }
    }

    /// Skip actual sends, reporting each as skipped
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn register(&mut self, sender: Arc<dyn ChannelSender>) {
        self.senders.push(sender);
    }

    pub fn sender_count(&self) -> usize {
        self.senders.len()
    }

    pub fn registered_channels(&self) -> Vec<Channel> {
        self.senders.iter().map(|s| s.channel()).collect()
    }

    fn sender_for(&self, channel: Channel) -> Option<&Arc<dyn ChannelSender>> {
        self.senders.iter().find(|s| s.channel() == channel)
    }

    /// Send through each selected channel in order, collecting per-channel
    /// outcomes. Errors are folded into `SendResult::Failed` and logged.
    pub fn dispatch(
        &self,
        user_id: &str,
        notification: &Notification,
        channels: &[Channel],
    ) -> Vec<(Channel, SendResult)> {
        let mut results = Vec::with_capacity(channels.len());

        for &channel in channels {
            if self.dry_run {
                results.push((channel, SendResult::Skipped("dry-run".to_string())));
                continue;
            }

            let result = match self.sender_for(channel) {
                Some(sender) => match sender.send(user_id, notification) {
                    Ok(result) => result,
                    Err(e) => {
                        warn!(channel = %channel, error = %e, "Channel send failed");
                        SendResult::Failed(e.to_string())
                    }
                },
                None => {
                    warn!(channel = %channel, "No sender registered for channel");
                    SendResult::Skipped("no sender registered".to_string())
                }
            };

            results.push((channel, result));
        }

        results
    }
}

impl Default for DeliveryDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
