//! End-to-end scenarios through the engine: decision, dispatch, store, digest

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use finbuddy_notify::{
    ActionButton, Channel, ChannelSender, Notification, NotificationEngine, NotificationRequest,
    SendResult, Urgency,
};

/// Sender double that records every call it receives
struct RecordingSender {
    channel: Channel,
    count: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    fn new(channel: Channel) -> Arc<Self> {
        Arc::new(Self {
            channel,
            count: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn sends(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

impl ChannelSender for RecordingSender {
    fn channel(&self) -> Channel {
        self.channel
    }

    fn send(&self, user_id: &str, notification: &Notification) -> Result<SendResult> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((user_id.to_string(), notification.id.clone()));
        Ok(SendResult::Sent)
    }
}

struct Harness {
    engine: NotificationEngine,
    push: Arc<RecordingSender>,
    email: Arc<RecordingSender>,
}

fn harness() -> Harness {
    let push = RecordingSender::new(Channel::Push);
    let email = RecordingSender::new(Channel::Email);
    let engine = NotificationEngine::builder()
        .relay_senders(false)
        .register_sender(push.clone())
        .register_sender(email.clone())
        .build()
        .unwrap();
    Harness { engine, push, email }
}

fn daytime() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 6, 3, 14, 0, 0).unwrap()
}

fn late_night() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 6, 3, 23, 0, 0).unwrap()
}

fn request(user: &str, urgency: Urgency, title: &str) -> NotificationRequest {
    NotificationRequest::new(user, title, "message body", urgency, "budget_guardian")
}

#[test]
fn critical_goes_out_through_push_and_email() {
    let h = harness();
    let n = h
        .engine
        .submit_at(request("u1", Urgency::Critical, "GST Compliance Warning"), late_night());

    assert_eq!(h.push.sends(), 1);
    assert_eq!(h.email.sends(), 1);
    assert_eq!(h.push.seen(), vec![("u1".to_string(), n.id.clone())]);

    let stored = h.engine.notifications("u1", false, None);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, n.id);
}

#[test]
fn high_at_night_delivered_low_suppressed() {
    let h = harness();
    let high = h
        .engine
        .submit_at(request("u1", Urgency::High, "Budget Alert"), late_night());
    let low = h
        .engine
        .submit_at(request("u1", Urgency::Low, "Budget Alert"), late_night());

    let stored = h.engine.notifications("u1", false, None);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, high.id);
    assert!(stored.iter().all(|n| n.id != low.id));
    // the suppressed low never reached the push channel either
    assert_eq!(h.push.sends(), 1);
}

#[test]
fn burst_of_medium_hits_the_cap_but_high_passes() {
    let h = harness();
    for i in 0..5 {
        let n = h
            .engine
            .submit_at(request("u1", Urgency::Medium, &format!("Insight {}", i)), daytime());
        assert!(h
            .engine
            .notifications("u1", false, None)
            .iter()
            .any(|stored| stored.id == n.id));
    }

    let sixth = h
        .engine
        .submit_at(request("u1", Urgency::Medium, "Insight 5"), daytime());
    let stored = h.engine.notifications("u1", false, None);
    assert_eq!(stored.len(), 5);
    assert!(stored.iter().all(|n| n.id != sixth.id));

    let seventh = h
        .engine
        .submit_at(request("u1", Urgency::High, "Budget Alert"), daytime());
    let stored = h.engine.notifications("u1", false, None);
    assert_eq!(stored.len(), 6);
    assert!(stored.iter().any(|n| n.id == seventh.id));
}

#[test]
fn burst_cap_is_per_user() {
    let h = harness();
    for i in 0..5 {
        h.engine
            .submit_at(request("u1", Urgency::Medium, &format!("Insight {}", i)), daytime());
    }

    let other = h
        .engine
        .submit_at(request("u2", Urgency::Medium, "Other user insight"), daytime());
    assert!(h
        .engine
        .notifications("u2", false, None)
        .iter()
        .any(|n| n.id == other.id));
}

#[test]
fn digest_enumerates_five_of_seven_unread() {
    let h = harness();
    for i in 0..5 {
        h.engine
            .submit_at(request("u1", Urgency::Medium, &format!("Insight {}", i)), daytime());
    }
    // the cap stops medium now; high still lands, giving 7 stored unread
    h.engine
        .submit_at(request("u1", Urgency::High, "Insight 5"), daytime());
    h.engine
        .submit_at(request("u1", Urgency::High, "Insight 6"), daytime());
    assert_eq!(h.engine.notifications("u1", true, None).len(), 7);

    let digest = h.engine.send_digest_at("u1", daytime()).unwrap();
    assert_eq!(digest.urgency, Urgency::Low);
    assert_eq!(digest.agent_name, "digest_service");
    assert!(digest.message.starts_with("You have 7 financial insights:"));
    assert_eq!(digest.message.matches('•').count(), 5);
}

#[test]
fn digest_with_no_unread_produces_nothing() {
    let h = harness();
    let n = h
        .engine
        .submit_at(request("u1", Urgency::Medium, "Insight"), daytime());
    h.engine.mark_read(&n.id);

    assert!(h.engine.send_digest_at("u1", daytime()).is_none());
}

#[test]
fn record_then_list_round_trips_every_field() {
    let h = harness();
    let mut data = serde_json::Map::new();
    data.insert("surplus".to_string(), serde_json::json!(5000));
    data.insert("allocation".to_string(), serde_json::json!({"emergency": 3000}));

    let request = NotificationRequest::new(
        "u1",
        "Savings Opportunity Detected",
        "I detected ₹5,000 surplus this month!",
        Urgency::Medium,
        "savings_optimizer",
    )
    .with_action_buttons(vec![
        ActionButton::new("Auto-Save", "auto_save"),
        ActionButton::new("Skip This Month", "skip"),
    ])
    .with_data(data.clone());

    h.engine.submit_at(request, daytime());
    let stored = h.engine.notifications("u1", false, None);
    assert_eq!(stored.len(), 1);

    let n = &stored[0];
    assert_eq!(n.title, "Savings Opportunity Detected");
    assert_eq!(n.message, "I detected ₹5,000 surplus this month!");
    assert_eq!(n.urgency, Urgency::Medium);
    assert_eq!(n.agent_name, "savings_optimizer");
    assert_eq!(n.action_buttons.len(), 2);
    assert_eq!(n.action_buttons[0], ActionButton::new("Auto-Save", "auto_save"));
    assert_eq!(n.data, data);
}

#[test]
fn mark_read_twice_equals_once() {
    let h = harness();
    let n = h
        .engine
        .submit_at(request("u1", Urgency::Medium, "Insight"), daytime());

    assert!(h.engine.mark_read(&n.id));
    let after_first = h.engine.notifications("u1", false, None);
    assert!(h.engine.mark_read(&n.id));
    let after_second = h.engine.notifications("u1", false, None);

    assert!(after_first[0].read);
    assert_eq!(after_first[0].read, after_second[0].read);
    assert_eq!(after_first.len(), after_second.len());
}

#[test]
fn clear_all_resets_the_throttle_window() {
    let h = harness();
    for i in 0..5 {
        h.engine
            .submit_at(request("u1", Urgency::Medium, &format!("Insight {}", i)), daytime());
    }
    h.engine.clear_all("u1");
    assert!(h.engine.notifications("u1", false, None).is_empty());

    // history went with the store, so the cap no longer applies
    let n = h
        .engine
        .submit_at(request("u1", Urgency::Medium, "Fresh insight"), daytime());
    assert!(h
        .engine
        .notifications("u1", false, None)
        .iter()
        .any(|stored| stored.id == n.id));
}
