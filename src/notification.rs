//! Notification entity, submit request shape and delivery history record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::channel::Channel;
use crate::urgency::Urgency;

/// Process-lifetime sequence number appended to ids so that notifications
/// created within the same millisecond stay unique.
static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

/// An action button attached to a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionButton {
    pub label: String,
    pub action: String,
}

impl ActionButton {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// A single alert instance. Immutable after creation apart from the
/// `read`/`dismissed` flags, which are mutated only through the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub urgency: Urgency,
    /// Originating subsystem, attribution only
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_buttons: Vec<ActionButton>,
    /// Opaque payload, passed through unmodified
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub dismissed: bool,
}

impl Notification {
    /// Build a notification from a submit request. The id and `created_at`
    /// are fixed here; callers never supply them.
    pub fn from_request(request: &NotificationRequest) -> Self {
        let created_at = Utc::now();
        let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("notif_{}_{}", created_at.timestamp_millis(), seq),
            title: request.title.clone(),
            message: request.message.clone(),
            urgency: request.urgency,
            agent_name: request.agent_name.clone(),
            action_buttons: request.action_buttons.clone(),
            data: request.data.clone(),
            created_at,
            read: false,
            dismissed: false,
        }
    }
}

/// Submit shape accepted from callers. Deserialization rejects an unknown
/// urgency value; nothing is defaulted in its place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub urgency: Urgency,
    pub agent_name: String,
    #[serde(default)]
    pub action_buttons: Vec<ActionButton>,
    #[serde(default)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl NotificationRequest {
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        urgency: Urgency,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            message: message.into(),
            urgency,
            agent_name: agent_name.into(),
            action_buttons: Vec::new(),
            data: serde_json::Map::new(),
        }
    }

    pub fn with_action_buttons(mut self, buttons: Vec<ActionButton>) -> Self {
        self.action_buttons = buttons;
        self
    }

    pub fn with_data(mut self, data: serde_json::Map<String, serde_json::Value>) -> Self {
        self.data = data;
        self
    }
}

/// Append-only delivery history entry, consumed by the frequency cap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub user_id: String,
    pub notification_id: String,
    pub sent_at: DateTime<Utc>,
    pub channels: Vec<Channel>,
}
