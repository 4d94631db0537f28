//! In-memory notification store and query layer
//!
//! Append-only apart from the `read`/`dismissed` flag mutations and the bulk
//! clear. The engine serializes access behind a mutex; this type itself is
//! plain data.

use tracing::debug;

use crate::notification::{DeliveryRecord, Notification};

/// Holds every stored notification plus the append-only delivery history
#[derive(Debug, Default)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
    history: Vec<DeliveryRecord>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub fn record_delivery(&mut self, record: DeliveryRecord) {
        self.history.push(record);
    }

    /// Delivery history, consumed by the frequency cap
    pub fn history(&self) -> &[DeliveryRecord] {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Ordered query over the store.
    ///
    /// Sorts ascending by `(severity rank, created_at)` and then reverses,
    /// which is the order the query API has always returned: newest first
    /// within an urgency band, and with tied timestamps the lower-severity
    /// bands come ahead of critical. Consumers depend on this exact order;
    /// replacing it with a severity-first sort is a breaking change.
    ///
    /// Dismissed notifications are not filtered here; they carry their own
    /// flag and unread views exclude them client-side.
    pub fn list(&self, unread_only: bool, limit: usize) -> Vec<Notification> {
        let mut results: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|n| !unread_only || !n.read)
            .cloned()
            .collect();

        results.sort_by(|a, b| {
            (a.urgency.rank(), a.created_at).cmp(&(b.urgency.rank(), b.created_at))
        });
        results.reverse();
        results.truncate(limit);
        results
    }

    /// Mark a notification read. Idempotent; `false` when the id is absent.
    pub fn mark_read(&mut self, notification_id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(notification) => {
                notification.read = true;
                debug!(id = %notification_id, "Notification marked as read");
                true
            }
            None => false,
        }
    }

    /// Dismiss a notification. The record stays in the store; only the flag
    /// changes. Idempotent; `false` when the id is absent.
    pub fn dismiss(&mut self, notification_id: &str) -> bool {
        match self.notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(notification) => {
                notification.dismissed = true;
                debug!(id = %notification_id, "Notification dismissed");
                true
            }
            None => false,
        }
    }

    /// Empties the whole store, history included. The store is single-tenant
    /// and not partitioned by user, so this clears every user's
    /// notifications.
    pub fn clear_all(&mut self) {
        self.notifications.clear();
        self.history.clear();
    }
}
