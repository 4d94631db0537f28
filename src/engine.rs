//! Notification engine - decision, dispatch and storage behind one handle
//!
//! One engine instance is constructed per process and handed to every
//! adapter; it owns the store, the delivery history, the decision policy and
//! the dispatcher. There is no global state.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

use crate::channel::{channels_for, ChannelSender};
use crate::channels::{InAppSender, RelaySender};
use crate::config::EngineConfig;
use crate::digest;
use crate::dispatcher::DeliveryDispatcher;
use crate::notification::{DeliveryRecord, Notification, NotificationRequest};
use crate::policy::DeliveryPolicy;
use crate::store::NotificationStore;
use crate::urgency::Urgency;

/// Proactive notification engine.
///
/// Mutating operations and the reads backing queries are serialized behind
/// one mutex; the lock is never held across channel sends, so a slow sender
/// cannot stall the decision/store path.
pub struct NotificationEngine {
    store: Mutex<NotificationStore>,
    dispatcher: DeliveryDispatcher,
    policy: DeliveryPolicy,
    config: EngineConfig,
}

impl NotificationEngine {
    /// Engine with the default channel wiring (in-app plus the relay
    /// senders for push, email and sms).
    pub fn new(config: EngineConfig) -> Result<Self> {
        EngineBuilder::new().config(config).build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    fn store(&self) -> MutexGuard<'_, NotificationStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a candidate notification.
    ///
    /// The created notification is always returned, delivered or not;
    /// callers distinguish the two by whether it shows up in a later query.
    /// A suppressed notification is genuinely dropped, never queued.
    pub fn submit(&self, request: NotificationRequest) -> Notification {
        self.submit_at(request, Local::now())
    }

    /// Submit with a fixed evaluation time (tests and replay).
    pub fn submit_at(&self, request: NotificationRequest, now: DateTime<Local>) -> Notification {
        let notification = Notification::from_request(&request);
        let channels = channels_for(notification.urgency);

        let approved = {
            let mut store = self.store();
            let approved = self.policy.should_deliver(
                store.history(),
                &request.user_id,
                notification.urgency,
                now,
            );
            if approved {
                store.insert(notification.clone());
                store.record_delivery(DeliveryRecord {
                    user_id: request.user_id.clone(),
                    notification_id: notification.id.clone(),
                    sent_at: now.with_timezone(&Utc),
                    channels: channels.to_vec(),
                });
            }
            approved
        };

        if approved {
            self.dispatcher.dispatch(&request.user_id, &notification, channels);
            info!(
                urgency = %notification.urgency,
                title = %notification.title,
                agent = %notification.agent_name,
                "Sent notification"
            );
        } else {
            info!(
                urgency = %notification.urgency,
                title = %notification.title,
                "Suppressed notification"
            );
        }

        notification
    }

    /// Ordered query. The store is single-tenant, so `user_id` is
    /// attribution only; `limit` defaults from the config when `None`.
    pub fn notifications(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: Option<usize>,
    ) -> Vec<Notification> {
        let limit = limit.unwrap_or(self.config.default_query_limit);
        debug!(user_id = %user_id, unread_only, limit, "Query notifications");
        self.store().list(unread_only, limit)
    }

    /// Idempotent; `false` when the id is absent (a no-op, not an error).
    pub fn mark_read(&self, notification_id: &str) -> bool {
        self.store().mark_read(notification_id)
    }

    /// Idempotent; `false` when the id is absent (a no-op, not an error).
    pub fn dismiss(&self, notification_id: &str) -> bool {
        self.store().dismiss(notification_id)
    }

    /// Clears the entire store, history included. Single-tenant: this drops
    /// every user's notifications regardless of `user_id`.
    pub fn clear_all(&self, user_id: &str) {
        self.store().clear_all();
        info!(user_id = %user_id, "All notifications cleared");
    }

    /// Digest over unread notifications, submitted through the full
    /// decision+dispatch pipeline. `None` when there is nothing unread.
    pub fn send_digest(&self, user_id: &str) -> Option<Notification> {
        self.send_digest_at(user_id, Local::now())
    }

    /// Digest with a fixed evaluation time (tests and replay).
    pub fn send_digest_at(&self, user_id: &str, now: DateTime<Local>) -> Option<Notification> {
        let unread = self.notifications(user_id, true, None);
        if unread.is_empty() {
            return None;
        }

        let message = digest::digest_message(&unread, self.config.digest_max_titles);
        let request = NotificationRequest::new(
            user_id,
            digest::DIGEST_TITLE,
            message,
            Urgency::Low,
            digest::DIGEST_AGENT,
        );
        info!(user_id = %user_id, unread = unread.len(), "Digest prepared");
        Some(self.submit_at(request, now))
    }
}

/// Wires config and senders into an engine instance
pub struct EngineBuilder {
    config: EngineConfig,
    senders: Vec<Arc<dyn ChannelSender>>,
    dry_run: bool,
    relay_senders: bool,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            senders: Vec::new(),
            dry_run: false,
            relay_senders: true,
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Extra sender, consulted after the built-in ones
    pub fn register_sender(mut self, sender: Arc<dyn ChannelSender>) -> Self {
        self.senders.push(sender);
        self
    }

    /// Skip actual channel sends
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Disable the built-in relay senders; tests register mocks instead
    pub fn relay_senders(mut self, enable: bool) -> Self {
        self.relay_senders = enable;
        self
    }

    pub fn build(self) -> Result<NotificationEngine> {
        let mut dispatcher = DeliveryDispatcher::new().with_dry_run(self.dry_run);

        dispatcher.register(Arc::new(InAppSender::new()));
        if self.relay_senders {
            let relay = self.config.relay.clone();
            dispatcher.register(Arc::new(RelaySender::push(relay.clone())?));
            dispatcher.register(Arc::new(RelaySender::email(relay.clone())?));
            dispatcher.register(Arc::new(RelaySender::sms(relay)?));
        }
        for sender in self.senders {
            dispatcher.register(sender);
        }

        let policy = DeliveryPolicy::from_config(&self.config);
        Ok(NotificationEngine {
            store: Mutex::new(NotificationStore::new()),
            dispatcher,
            policy,
            config: self.config,
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
