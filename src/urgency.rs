//! Urgency classification for notifications
//!
//! The urgency level drives both routing and throttling:
//! - CRITICAL: immediate action required, always delivered
//! - HIGH: important warning, exempt from the hourly frequency cap
//! - MEDIUM: helpful suggestion
//! - LOW: celebration/info, digest material

/// Urgency level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }

    /// Severity rank used for ordering: critical=0 ... low=3.
    pub fn rank(&self) -> u8 {
        match self {
            Urgency::Critical => 0,
            Urgency::High => 1,
            Urgency::Medium => 2,
            Urgency::Low => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_as_str() {
        assert_eq!(Urgency::Critical.as_str(), "critical");
        assert_eq!(Urgency::High.as_str(), "high");
        assert_eq!(Urgency::Medium.as_str(), "medium");
        assert_eq!(Urgency::Low.as_str(), "low");
    }

    #[test]
    fn test_urgency_display() {
        assert_eq!(format!("{}", Urgency::Critical), "critical");
        assert_eq!(format!("{}", Urgency::Low), "low");
    }

    #[test]
    fn test_urgency_rank_order() {
        assert!(Urgency::Critical.rank() < Urgency::High.rank());
        assert!(Urgency::High.rank() < Urgency::Medium.rank());
        assert!(Urgency::Medium.rank() < Urgency::Low.rank());
    }

    #[test]
    fn test_urgency_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Urgency::Critical).unwrap(), "\"critical\"");
        let parsed: Urgency = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Urgency::High);
    }

    #[test]
    fn test_urgency_unknown_value_rejected() {
        // No default urgency is synthesized for unknown values
        let result: Result<Urgency, _> = serde_json::from_str("\"urgent\"");
        assert!(result.is_err());
    }
}
