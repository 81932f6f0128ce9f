//! Monitor cadence and staleness settings.

use std::time::Duration;

use serde::Deserialize;

/// Settings read by the monitor on every tick.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitorConfig {
    /// Chain data older than this is stale (default: 120).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay between the end of one tick and the start of the next (default: 3000).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Static demo configuration: run a single tick and never reschedule.
    #[serde(default)]
    pub demo_mode: bool,
}

const fn default_timeout_secs() -> u64 {
    120
}

const fn default_poll_interval_ms() -> u64 {
    3000
}

impl MonitorConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            demo_mode: false,
        }
    }
}
