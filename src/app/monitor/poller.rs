//! Connectivity/readiness state machine.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Monitor, Refresh};
use crate::domain::{ConnectionStatus, Effect, LoadScope};

/// Load-progress value published when chain data is stale. The refresh
/// attempt is over even though nothing usable was loaded.
const PROGRESS_STALE: u8 = 100;

/// Load-progress value published when a full load is about to start.
const PROGRESS_LOADING: u8 = 0;

/// Outcome of the freshness policy for a reachable client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Chain age exceeds the timeout.
    Stale,
    /// Fresh, and either not ready yet or just reconnected: full reload.
    Recovered,
    /// Fresh and already ready: nothing to reload.
    Steady,
}

impl Freshness {
    #[must_use]
    pub fn evaluate(chain_age: Duration, timeout: Duration, ready: bool, was_down: bool) -> Self {
        if chain_age > timeout {
            Self::Stale
        } else if !ready || was_down {
            Self::Recovered
        } else {
            Self::Steady
        }
    }
}

/// A tick whose synchronous part has completed.
///
/// The freshness decision runs on a spawned task once the latest-block
/// result is in. Dropping the `Tick` detaches that task; use
/// [`cancel`](Self::cancel) to stop it.
pub struct Tick {
    available: bool,
    was_down: bool,
    pending: Option<JoinHandle<Decision>>,
    decision: Option<Decision>,
}

struct Decision {
    freshness: Option<Freshness>,
    refreshes: Vec<Refresh>,
}

/// What a tick observed and decided, once all of its fetches have settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub available: bool,
    pub was_down: bool,
    /// `None` when the client was unreachable or no block age is known yet.
    pub freshness: Option<Freshness>,
}

impl Tick {
    #[must_use]
    pub fn available(&self) -> bool {
        self.available
    }

    #[must_use]
    pub fn was_down(&self) -> bool {
        self.was_down
    }

    /// Wait for the freshness decision, but not for the secondary metric
    /// fetches. Cancel-safe: dropping the future leaves the decision pending.
    pub async fn decide(&mut self) -> Option<Freshness> {
        if let Some(pending) = self.pending.as_mut() {
            let outcome = pending.await;
            self.pending = None;
            match outcome {
                Ok(decision) => self.decision = Some(decision),
                Err(e) => warn!(error = %e, "Freshness decision task failed"),
            }
        }
        self.decision.as_ref().and_then(|decision| decision.freshness)
    }

    /// Abort an undecided freshness decision and wait until it can no
    /// longer emit. A decision that already ran is left as it is.
    pub async fn cancel(self) {
        if let Some(pending) = self.pending {
            pending.abort();
            match pending.await {
                Ok(_) => debug!("Freshness decision finished before it could be cancelled"),
                Err(e) if e.is_cancelled() => debug!("Freshness decision cancelled"),
                Err(e) => warn!(error = %e, "Freshness decision task failed"),
            }
        }
    }

    /// Wait for the freshness decision and every fetch the tick started.
    pub async fn settle(mut self) -> TickReport {
        let freshness = self.decide().await;
        if let Some(decision) = self.decision.take() {
            for refresh in decision.refreshes {
                refresh.settle().await;
            }
        }
        TickReport {
            available: self.available,
            was_down: self.was_down,
            freshness,
        }
    }
}

impl Monitor {
    /// One pass of the state machine.
    ///
    /// Checks availability, handles the down/connect transitions, then starts
    /// a metric refresh. Returns without waiting for the fetches; the
    /// freshness policy is applied when the latest block arrives.
    pub async fn tick(&self) -> Tick {
        let now_up = self.inner.client.is_available().await;
        let was_down = self.inner.state.lock().status().is_down();

        if !now_up {
            self.mark_unavailable();
            return Tick {
                available: false,
                was_down,
                pending: None,
                decision: None,
            };
        }

        if was_down {
            self.mark_connected();
        }

        let mut refresh = self.refresh();
        let monitor = self.clone();
        let pending = tokio::spawn(async move {
            refresh.latest().await;
            let (freshness, bootstrap) = monitor.apply_freshness(was_down);
            let mut refreshes = vec![refresh];
            refreshes.extend(bootstrap);
            Decision {
                freshness,
                refreshes,
            }
        });

        Tick {
            available: true,
            was_down,
            pending: Some(pending),
            decision: None,
        }
    }

    /// Full bootstrap: client refresh, metrics, cascading load, subscription.
    pub fn load_everything(&self) -> Refresh {
        self.emit(Effect::TriggerBootstrap);
        let refresh = self.refresh();
        self.emit(Effect::TriggerLoad(LoadScope::Full));
        self.start_subscription();
        refresh
    }

    fn mark_unavailable(&self) {
        let previous = self.inner.state.lock().set_status(ConnectionStatus::Failed);
        if previous.is_connected() {
            warn!(client = self.client_name(), "Ledger client unreachable");
        } else {
            debug!(client = self.client_name(), %previous, "Ledger client still unreachable");
        }
        self.emit_all([
            Effect::SetStatus(ConnectionStatus::Failed),
            Effect::SetReady(false),
            Effect::HoldLoading,
        ]);
    }

    fn mark_connected(&self) {
        let previous = self
            .inner
            .state
            .lock()
            .set_status(ConnectionStatus::Connected);
        info!(client = self.client_name(), %previous, "Ledger client connected");
        self.emit(Effect::SetStatus(ConnectionStatus::Connected));
        self.start_subscription();
    }

    fn apply_freshness(&self, was_down: bool) -> (Option<Freshness>, Option<Refresh>) {
        let timeout = self.config().timeout();

        let (freshness, chain_age) = {
            let mut state = self.inner.state.lock();
            let Some(chain_age) = state.chain_age() else {
                debug!("No block seen yet, skipping freshness check");
                return (None, None);
            };
            if !state.status().is_connected() {
                debug!("Client dropped before the latest block arrived");
                return (None, None);
            }
            let freshness = Freshness::evaluate(chain_age, timeout, state.is_ready(), was_down);
            match freshness {
                Freshness::Stale => {
                    state.set_ready(false);
                }
                Freshness::Recovered => {
                    state.set_ready(true);
                }
                Freshness::Steady => {}
            }
            (freshness, chain_age)
        };

        match freshness {
            Freshness::Stale => {
                warn!(
                    chain_age_secs = chain_age.as_secs(),
                    timeout_secs = timeout.as_secs(),
                    "Chain data is stale"
                );
                self.emit_all([
                    Effect::HoldLoading,
                    Effect::SetReady(false),
                    Effect::SetProgress(PROGRESS_STALE),
                    Effect::TriggerLoad(LoadScope::AddressesOnly),
                ]);
                (Some(freshness), None)
            }
            Freshness::Recovered => {
                info!(
                    chain_age_secs = chain_age.as_secs(),
                    was_down, "Chain data is fresh, loading dependent data"
                );
                self.emit_all([
                    Effect::HoldLoading,
                    Effect::SetReady(true),
                    Effect::SetProgress(PROGRESS_LOADING),
                ]);
                (Some(freshness), Some(self.load_everything()))
            }
            Freshness::Steady => (Some(freshness), None),
        }
    }
}
