//! Connectivity and readiness monitor.
//!
//! One owner, three facets:
//!
//! - [`poller`] - the periodic availability/freshness state machine
//! - [`refresher`] - metric fetches folded into the connectivity state
//! - [`subscription`] - the block-arrival subscription lifecycle
//!
//! The monitor holds its collaborators by injection. State mutations are
//! short critical sections on a `parking_lot::Mutex` with no `.await` inside,
//! and effects are emitted after the lock is released.

mod poller;
mod refresher;
mod subscription;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::config::MonitorConfig;
use crate::domain::{ConnectionStatus, ConnectivitySnapshot, ConnectivityState, Effect};
use crate::port::{EffectSink, RemoteClient};

pub use poller::{Freshness, Tick, TickReport};
pub use refresher::Refresh;

/// Reason passed to the client when the run loop shuts down.
const SHUTDOWN_REASON: &str = "monitor shutdown";

/// Watches a remote ledger client and derives the readiness signal.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct Monitor {
    inner: Arc<Inner>,
}

struct Inner {
    client: Arc<dyn RemoteClient>,
    sink: Arc<dyn EffectSink>,
    config: RwLock<MonitorConfig>,
    state: Mutex<ConnectivityState>,
}

impl Monitor {
    #[must_use]
    pub fn new(
        client: Arc<dyn RemoteClient>,
        sink: Arc<dyn EffectSink>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                sink,
                config: RwLock::new(config),
                state: Mutex::new(ConnectivityState::new()),
            }),
        }
    }

    /// Current settings. Re-read at the start of every tick.
    #[must_use]
    pub fn config(&self) -> MonitorConfig {
        self.inner.config.read().clone()
    }

    /// Swap settings; takes effect from the next tick.
    pub fn update_config(&self, config: MonitorConfig) {
        *self.inner.config.write() = config;
    }

    #[must_use]
    pub fn snapshot(&self) -> ConnectivitySnapshot {
        self.inner.state.lock().snapshot()
    }

    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.inner.state.lock().status()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.inner.state.lock().is_ready()
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.inner.state.lock().is_subscribed()
    }

    fn client_name(&self) -> &'static str {
        self.inner.client.name()
    }

    fn emit(&self, effect: Effect) {
        self.inner.sink.emit(effect);
    }

    fn emit_all(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.emit(effect);
        }
    }

    /// Run the poll loop on a background task.
    #[must_use]
    pub fn spawn(&self) -> MonitorHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let monitor = self.clone();
        let task = tokio::spawn(async move { monitor.run(shutdown_rx).await });
        MonitorHandle {
            shutdown: shutdown_tx,
            task,
        }
    }

    /// Tick, wait for its freshness decision, wait `poll_interval`, repeat.
    ///
    /// A tick is over once its decision has run, so ticks never overlap
    /// however slow the latest-block fetch is. Secondary metric fetches are
    /// not waited for. Demo mode stops the loop after the first tick. A
    /// shutdown signal cancels any pending decision and then drops the
    /// block subscription, so nothing re-subscribes after the loop exits.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(client = self.client_name(), "Monitor started");

        loop {
            let mut tick = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                tick = self.tick() => tick,
            };

            let interrupted = tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => true,
                _ = tick.decide() => false,
            };
            if interrupted {
                tick.cancel().await;
                break;
            }

            let config = self.config();
            if config.demo_mode {
                info!("Demo mode, polling disabled");
                return;
            }

            tokio::select! {
                biased;
                _ = wait_for_shutdown(&mut shutdown) => break,
                () = tokio::time::sleep(config.poll_interval()) => {}
            }
        }

        self.stop_subscription(Some(SHUTDOWN_REASON));
        info!("Monitor stopped");
    }
}

/// Resolves once shutdown is requested or the sender is dropped.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            debug!("Shutdown sender dropped");
            return;
        }
    }
}

/// Owns a spawned poll loop.
pub struct MonitorHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Whether the loop has exited (demo mode or shutdown).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the loop to stop and wait for it.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Monitor task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testkit::{self, Call, RecordingSink, ScriptedClient};

    fn monitor(client: &Arc<ScriptedClient>, config: MonitorConfig) -> (Monitor, RecordingSink) {
        let sink = RecordingSink::new();
        let monitor = Monitor::new(client.clone(), Arc::new(sink.clone()), config);
        (monitor, sink)
    }

    #[tokio::test]
    async fn demo_mode_runs_a_single_tick() {
        let client = Arc::new(ScriptedClient::fresh());
        let mut config = testkit::config::fast_polling();
        config.demo_mode = true;
        let (monitor, _sink) = monitor(&client, config);

        let handle = monitor.spawn();
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.is_finished());
        assert_eq!(client.availability_checks(), 1);
    }

    #[tokio::test]
    async fn loop_keeps_polling_until_shutdown() {
        let client = Arc::new(ScriptedClient::fresh());
        let (monitor, _sink) = monitor(&client, testkit::config::fast_polling());

        let handle = monitor.spawn();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!handle.is_finished());
        handle.shutdown().await;

        assert!(client.availability_checks() >= 2);
        assert!(!monitor.is_subscribed());
        assert_eq!(client.active_registrations(), 0);
        assert_eq!(
            client.stop_reasons(),
            vec![Some(SHUTDOWN_REASON.to_string())]
        );
    }

    #[tokio::test]
    async fn switching_to_demo_mode_stops_rescheduling() {
        let client = Arc::new(ScriptedClient::fresh());
        let (monitor, _sink) = monitor(&client, testkit::config::fast_polling());

        let handle = monitor.spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let mut config = monitor.config();
        config.demo_mode = true;
        monitor.update_config(config);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.is_finished());
        let checks = client.availability_checks();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(client.availability_checks(), checks);
    }

    fn count(sink: &RecordingSink, effect: &Effect) -> usize {
        sink.effects().iter().filter(|e| *e == effect).count()
    }

    #[tokio::test]
    async fn slow_latest_block_bootstraps_once_per_connect() {
        let client = Arc::new(ScriptedClient::fresh());
        client.delay(Call::LatestBlock, Duration::from_millis(150));
        let (monitor, sink) = monitor(&client, testkit::config::fast_polling());

        let handle = monitor.spawn();
        tokio::time::sleep(Duration::from_millis(700)).await;
        handle.shutdown().await;

        assert_eq!(count(&sink, &Effect::TriggerBootstrap), 1);
        assert_eq!(count(&sink, &Effect::SetReady(true)), 1);
        // Each tick waits out its 150 ms decision before re-arming.
        let checks = client.availability_checks();
        assert!((2..=6).contains(&checks), "{checks} availability checks");
    }

    #[tokio::test]
    async fn shutdown_cancels_pending_decision() {
        let client = Arc::new(ScriptedClient::fresh());
        client.delay(Call::LatestBlock, Duration::from_millis(300));
        let (monitor, sink) = monitor(&client, testkit::config::monitor(120));

        let handle = monitor.spawn();
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.shutdown().await;
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(!monitor.is_subscribed());
        assert_eq!(client.active_registrations(), 0);
        assert!(!monitor.is_ready());
        assert!(!sink.contains(&Effect::TriggerBootstrap));
        assert_eq!(
            client.stop_reasons(),
            vec![Some(SHUTDOWN_REASON.to_string())]
        );
    }
}
