//! Configuration module
//!
//! Connection settings shared by every command, and the polling budget used
//! while waiting for a run.

use std::time::Duration;

/// Smallest poll interval the orchestrator will honour
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the job-execution service API
    pub api_url: String,
    /// API token; checked before any network call
    pub token: Option<String>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        Ok(())
    }
}

/// How long and how often to poll a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between two status queries
    pub poll_interval: Duration,
    /// Wall-clock ceiling on waiting, independent of the service's own timeout
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl PollConfig {
    pub fn from_secs(poll_interval: u64, max_wait: u64) -> Self {
        Self {
            poll_interval: Duration::from_secs(poll_interval),
            max_wait: Duration::from_secs(max_wait),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}
