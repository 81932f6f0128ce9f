//! The authoritative connectivity record owned by the monitor.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::metrics::{MetricsUpdate, NetworkMetrics};
use super::status::ConnectionStatus;

/// Connectivity and readiness of the remote client.
///
/// Mutated only by the monitor. The setters enforce the record's invariants:
/// readiness requires a connected status, dropping out of `Connected`
/// clears readiness, and block updates older than the recorded block are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityState {
    status: ConnectionStatus,
    ready: bool,
    /// Chain age as measured by the last successful latest-block fetch,
    /// and when it was measured.
    head_age: Option<(Duration, Instant)>,
    metrics: NetworkMetrics,
    subscription_active: bool,
}

impl ConnectivityState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Age of the freshest known block, `None` before the first one arrives.
    ///
    /// Keeps growing while latest-block fetches fail, so a client that
    /// answers availability checks but stops serving blocks goes stale.
    #[must_use]
    pub fn chain_age(&self) -> Option<Duration> {
        self.chain_age_at(Instant::now())
    }

    #[must_use]
    pub fn chain_age_at(&self, now: Instant) -> Option<Duration> {
        self.head_age
            .map(|(age, measured)| age + now.saturating_duration_since(measured))
    }

    #[must_use]
    pub fn metrics(&self) -> &NetworkMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription_active
    }

    /// Record a new status and return the previous one.
    pub fn set_status(&mut self, status: ConnectionStatus) -> ConnectionStatus {
        let previous = std::mem::replace(&mut self.status, status);
        if !status.is_connected() {
            self.ready = false;
        }
        previous
    }

    /// Set readiness. Returns `false` (and leaves the state untouched) when
    /// asked to become ready while not connected.
    pub fn set_ready(&mut self, ready: bool) -> bool {
        if ready && !self.status.is_connected() {
            return false;
        }
        self.ready = ready;
        true
    }

    /// Apply a metric result. Returns `false` if the update was discarded
    /// because it describes an older block than the one already recorded.
    pub fn apply(&mut self, update: &MetricsUpdate) -> bool {
        let known = self.metrics.block_number;
        match update {
            MetricsUpdate::LatestBlock {
                number, chain_age, ..
            } => {
                if known.is_some_and(|known| *number < known) {
                    return false;
                }
                self.head_age = Some((*chain_age, Instant::now()));
            }
            MetricsUpdate::BlockTime { number, .. } => {
                if known.is_some_and(|known| *number < known) {
                    return false;
                }
            }
            _ => {}
        }
        self.metrics.apply(update);
        true
    }

    /// Mark the block subscription active. Returns `false` if it already was.
    pub(crate) fn claim_subscription(&mut self) -> bool {
        !std::mem::replace(&mut self.subscription_active, true)
    }

    /// Mark the block subscription inactive. Returns `false` if it already was.
    pub(crate) fn release_subscription(&mut self) -> bool {
        std::mem::replace(&mut self.subscription_active, false)
    }

    #[must_use]
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        ConnectivitySnapshot {
            status: self.status,
            ready: self.ready,
            chain_age_ms: self
                .chain_age()
                .map(|age| u64::try_from(age.as_millis()).unwrap_or(u64::MAX)),
            subscription_active: self.subscription_active,
            metrics: self.metrics.clone(),
        }
    }
}

/// Read-only copy of [`ConnectivityState`] handed to other components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivitySnapshot {
    pub status: ConnectionStatus,
    pub ready: bool,
    pub chain_age_ms: Option<u64>,
    pub subscription_active: bool,
    pub metrics: NetworkMetrics,
}
