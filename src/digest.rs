//! Digest formatting over unread notifications

use crate::notification::Notification;

pub const DIGEST_TITLE: &str = "Your Daily Financial Digest";
pub const DIGEST_AGENT: &str = "digest_service";

/// Digest body: an insight count plus up to `max_titles` bullet lines.
pub fn digest_message(unread: &[Notification], max_titles: usize) -> String {
    let mut message = format!("You have {} financial insights:\n", unread.len());
    for notification in unread.iter().take(max_titles) {
        message.push_str(&format!("• {}\n", notification.title));
    }
    message
}
