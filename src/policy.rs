//! Delivery decision policy
//!
//! Decides whether a candidate notification is delivered immediately or
//! suppressed, from the delivery history and the time of day. Prevents
//! notification fatigue during bursts and outside waking hours. The
//! evaluation time is injected so the rules stay testable.

use chrono::{DateTime, Duration, Local, Timelike, Utc};

use crate::config::EngineConfig;
use crate::notification::DeliveryRecord;
use crate::urgency::Urgency;

/// Frequency and time-of-day gate for outgoing notifications
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    max_per_hour: usize,
    active_hours: (u32, u32),
}

impl DeliveryPolicy {
    pub fn new(max_per_hour: usize, active_hours: (u32, u32)) -> Self {
        Self {
            max_per_hour,
            active_hours,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.max_per_hour,
            (config.active_hours_start, config.active_hours_end),
        )
    }

    /// Rules in order, first match decides:
    /// 1. critical is always delivered
    /// 2. at `max_per_hour`+ deliveries for this user in the trailing hour,
    ///    everything below high is suppressed
    /// 3. outside the active-hours window only critical/high go out
    /// 4. otherwise deliver
    pub fn should_deliver(
        &self,
        history: &[DeliveryRecord],
        user_id: &str,
        urgency: Urgency,
        now: DateTime<Local>,
    ) -> bool {
        if urgency == Urgency::Critical {
            return true;
        }

        let cutoff: DateTime<Utc> = (now - Duration::hours(1)).with_timezone(&Utc);
        let recent = history
            .iter()
            .filter(|record| record.user_id == user_id && record.sent_at > cutoff)
            .count();
        if recent >= self.max_per_hour && urgency != Urgency::High {
            return false;
        }

        let hour = now.hour();
        if hour < self.active_hours.0 || hour > self.active_hours.1 {
            return matches!(urgency, Urgency::Critical | Urgency::High);
        }

        true
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}
