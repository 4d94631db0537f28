//! Engine configuration
//!
//! Loaded from `~/.config/finbuddy-notify/config.json` when present; every
//! field falls back to the built-in default, so a partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Relay gateway settings shared by the push/email/sms senders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Gateway URL (e.g. http://localhost:9080)
    pub gateway_url: String,
    /// Bearer token, empty to send unauthenticated
    pub token: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:9080".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Tunables for the decision policy, query layer and digest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deliveries per user in the trailing hour before non-high urgencies
    /// are suppressed
    pub max_per_hour: usize,
    /// First hour of the active window (inclusive)
    pub active_hours_start: u32,
    /// Last hour of the active window (inclusive)
    pub active_hours_end: u32,
    /// Titles enumerated in a digest notification
    pub digest_max_titles: usize,
    /// Query limit when the caller does not supply one
    pub default_query_limit: usize,
    pub relay: RelayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_per_hour: 5,
            active_hours_start: 9,
            active_hours_end: 22,
            digest_max_titles: 5,
            default_query_limit: 50,
            relay: RelayConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Default config file location
    pub fn path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("finbuddy-notify")
            .join("config.json")
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}
