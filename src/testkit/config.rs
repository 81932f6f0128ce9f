//! Canonical test configurations.

use crate::app::MonitorConfig;

/// Monitor config with the given staleness timeout and the default cadence.
pub fn monitor(timeout_secs: u64) -> MonitorConfig {
    MonitorConfig {
        timeout_secs,
        ..MonitorConfig::default()
    }
}

/// Monitor config that re-ticks every 10 ms, for run-loop tests.
pub fn fast_polling() -> MonitorConfig {
    MonitorConfig {
        poll_interval_ms: 10,
        ..MonitorConfig::default()
    }
}
