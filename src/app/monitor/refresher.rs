//! Metric fetches against the remote client.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::Monitor;
use crate::domain::{Block, BlockId, Effect, MetricsUpdate};
use crate::error::Result;
use crate::port::RemoteClient;

/// Fetches started by one [`Monitor::refresh`] call.
///
/// Each fetch applies its own result as soon as it arrives. Dropping the
/// handle leaves them running.
pub struct Refresh {
    latest: Option<oneshot::Receiver<Option<Block>>>,
    tasks: Vec<JoinHandle<()>>,
}

impl Refresh {
    /// Wait for the latest-block fetch only. `None` if it failed.
    pub async fn latest(&mut self) -> Option<Block> {
        match self.latest.take() {
            Some(rx) => rx.await.ok().flatten(),
            None => None,
        }
    }

    /// Wait for every fetch to finish, successfully or not.
    pub async fn settle(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Metric fetch task failed");
            }
        }
    }
}

impl Monitor {
    /// Fetch the latest block (and its predecessor for block time) plus the
    /// five secondary metrics, all independently.
    pub fn refresh(&self) -> Refresh {
        let (latest_tx, latest_rx) = oneshot::channel();
        let monitor = self.clone();

        let tasks = vec![
            tokio::spawn(async move { monitor.refresh_blocks(latest_tx).await }),
            self.spawn_metric(
                "client_version",
                |client| async move { client.client_version().await },
                MetricsUpdate::ClientVersion,
            ),
            self.spawn_metric(
                "peer_count",
                |client| async move { client.peer_count().await },
                MetricsUpdate::PeerCount,
            ),
            self.spawn_metric(
                "gas_price",
                |client| async move { client.gas_price().await },
                MetricsUpdate::GasPrice,
            ),
            self.spawn_metric(
                "mining",
                |client| async move { client.mining().await },
                MetricsUpdate::Mining,
            ),
            self.spawn_metric(
                "hashrate",
                |client| async move { client.hashrate().await },
                MetricsUpdate::Hashrate,
            ),
        ];

        Refresh {
            latest: Some(latest_rx),
            tasks,
        }
    }

    /// Latest block first, reported on `latest_tx` as soon as it is applied,
    /// then the previous block for the inter-block time.
    async fn refresh_blocks(self, latest_tx: oneshot::Sender<Option<Block>>) {
        let latest = match self.inner.client.get_block(BlockId::Latest).await {
            Ok(block) => block,
            Err(e) => {
                debug!(error = %e, "Latest block fetch failed, keeping last known chain age");
                let _ = latest_tx.send(None);
                return;
            }
        };

        self.apply_metric(MetricsUpdate::LatestBlock {
            number: latest.number,
            date: latest.display_date(),
            chain_age: latest.age_at(Utc::now()),
        });
        let _ = latest_tx.send(Some(latest));

        let Some(previous_id) = latest.previous_id() else {
            return;
        };
        match self.inner.client.get_block(previous_id).await {
            Ok(previous) => {
                self.apply_metric(MetricsUpdate::BlockTime {
                    number: latest.number,
                    secs: latest.interval_since(&previous),
                });
            }
            Err(e) => {
                debug!(block = %previous_id, error = %e, "Previous block fetch failed");
            }
        }
    }

    fn spawn_metric<T, F, Fut>(
        &self,
        metric: &'static str,
        fetch: F,
        into_update: fn(T) -> MetricsUpdate,
    ) -> JoinHandle<()>
    where
        F: FnOnce(Arc<dyn RemoteClient>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let fetch = fetch(Arc::clone(&self.inner.client));
        let monitor = self.clone();
        tokio::spawn(async move {
            match fetch.await {
                Ok(value) => monitor.apply_metric(into_update(value)),
                Err(e) => debug!(metric, error = %e, "Metric fetch failed, keeping last known value"),
            }
        })
    }

    fn apply_metric(&self, update: MetricsUpdate) {
        let applied = self.inner.state.lock().apply(&update);
        if applied {
            debug!(metric = update.name(), ?update, "Metric updated");
            self.emit(Effect::SetMetrics(update));
        } else {
            debug!(metric = update.name(), "Discarded update for an older block");
        }
    }
}
