//! Ethereum JSON-RPC client over HTTP.
//!
//! Block arrival is detected by polling `eth_blockNumber` on a background
//! task; the handler fires whenever the head advances.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::dto::{block_param, parse_quantity, quantity_u64, BlockHeader, RpcRequest, RpcResponse};
use crate::app::RpcConfig;
use crate::domain::{Block, BlockId};
use crate::error::{Error, Result};
use crate::port::{BlockHandler, RemoteClient};

/// HTTP JSON-RPC client for a ledger daemon.
pub struct JsonRpcClient {
    transport: Arc<Transport>,
    block_poll_interval: Duration,
    subscription: Mutex<Option<JoinHandle<()>>>,
}

struct Transport {
    http: RwLock<HttpClient>,
    url: String,
    timeout: Duration,
    connect_timeout: Duration,
    next_id: AtomicU64,
}

impl Transport {
    fn build_http(timeout: Duration, connect_timeout: Duration) -> HttpClient {
        HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            })
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let http = self.http.read().clone();

        let response = http
            .post(&self.url)
            .json(&RpcRequest::new(id, method, params))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?
            .error_for_status()?;
        let body: RpcResponse = response.json().await?;
        body.into_result()
    }

    async fn quantity(&self, method: &str) -> Result<u128> {
        let raw: String = self.call(method, json!([])).await?;
        parse_quantity(&raw)
    }

    async fn block_number(&self) -> Result<u64> {
        let raw: String = self.call("eth_blockNumber", json!([])).await?;
        quantity_u64(&raw)
    }

    /// Unreachable or silent daemons surface as `Error::Connection`; anything
    /// else stays an HTTP error.
    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_connect() || e.is_timeout() {
            Error::Connection(format!("{}: {e}", self.url))
        } else {
            Error::Http(e)
        }
    }

    fn reconnect(&self) {
        *self.http.write() = Self::build_http(self.timeout, self.connect_timeout);
    }
}

impl JsonRpcClient {
    #[must_use]
    pub fn from_config(config: &RpcConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        let connect_timeout = Duration::from_millis(config.connect_timeout_ms);
        Self {
            transport: Arc::new(Transport {
                http: RwLock::new(Transport::build_http(timeout, connect_timeout)),
                url: config.url.clone(),
                timeout,
                connect_timeout,
                next_id: AtomicU64::new(1),
            }),
            block_poll_interval: Duration::from_millis(config.block_poll_interval_ms),
            subscription: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.transport.url
    }

    /// Whether a block-watching task is currently running.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.subscription
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for JsonRpcClient {
    fn drop(&mut self) {
        if let Some(task) = self.subscription.get_mut().take() {
            task.abort();
        }
    }
}

async fn watch_blocks(transport: Arc<Transport>, interval: Duration, handler: BlockHandler) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_seen: Option<u64> = None;

    loop {
        ticker.tick().await;
        match transport.block_number().await {
            Ok(number) => match last_seen {
                Some(last) if number > last => {
                    debug!(block = number, "New block");
                    last_seen = Some(number);
                    handler();
                }
                None => last_seen = Some(number),
                Some(_) => {}
            },
            Err(e) => debug!(error = %e, "Block number poll failed"),
        }
    }
}

#[async_trait]
impl RemoteClient for JsonRpcClient {
    async fn is_available(&self) -> bool {
        match self.transport.call::<bool>("net_listening", json!([])).await {
            Ok(listening) => listening,
            Err(e) => {
                debug!(url = %self.transport.url, error = %e, "Availability check failed");
                false
            }
        }
    }

    async fn get_block(&self, id: BlockId) -> Result<Block> {
        let header: Option<BlockHeader> = self
            .transport
            .call("eth_getBlockByNumber", json!([block_param(id), false]))
            .await?;
        header
            .ok_or_else(|| Error::Parse(format!("block {id} not found")))?
            .try_into()
    }

    async fn client_version(&self) -> Result<String> {
        self.transport.call("web3_clientVersion", json!([])).await
    }

    async fn peer_count(&self) -> Result<u64> {
        let count = self.transport.quantity("net_peerCount").await?;
        u64::try_from(count).map_err(|_| Error::Parse(format!("peer count out of range: {count}")))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.transport.quantity("eth_gasPrice").await
    }

    async fn mining(&self) -> Result<bool> {
        self.transport.call("eth_mining", json!([])).await
    }

    async fn hashrate(&self) -> Result<u64> {
        let rate = self.transport.quantity("eth_hashrate").await?;
        u64::try_from(rate).map_err(|_| Error::Parse(format!("hashrate out of range: {rate}")))
    }

    fn start_block_subscription(&self, handler: BlockHandler) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Subscription(format!("no async runtime: {e}")))?;
        let task = runtime.spawn(watch_blocks(
            Arc::clone(&self.transport),
            self.block_poll_interval,
            handler,
        ));

        if let Some(previous) = self.subscription.lock().replace(task) {
            warn!("Replacing existing block watcher");
            previous.abort();
        }
        info!(
            url = %self.transport.url,
            interval = ?self.block_poll_interval,
            "Watching for new blocks"
        );
        Ok(())
    }

    fn stop_block_subscription(&self, reason: Option<&str>) {
        if let Some(task) = self.subscription.lock().take() {
            task.abort();
            info!(reason = reason.unwrap_or("none"), "Stopped watching for new blocks");
        }
    }

    fn reset(&self) {
        info!(url = %self.transport.url, "Rebuilding HTTP client");
        self.transport.reconnect();
    }

    fn name(&self) -> &'static str {
        "json-rpc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> JsonRpcClient {
        JsonRpcClient::from_config(&RpcConfig {
            url: "http://127.0.0.1:1".into(),
            timeout_ms: 500,
            connect_timeout_ms: 200,
            block_poll_interval_ms: 10,
        })
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        let client = unreachable();
        assert!(!client.is_available().await);
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails_fetches() {
        let client = unreachable();
        assert!(matches!(
            client.get_block(BlockId::Latest).await,
            Err(Error::Connection(_))
        ));
        assert!(matches!(
            client.peer_count().await,
            Err(Error::Connection(_))
        ));
    }

    #[tokio::test]
    async fn subscription_task_lifecycle() {
        let client = unreachable();
        client.start_block_subscription(Arc::new(|| {})).unwrap();
        assert!(client.is_watching());

        client.stop_block_subscription(Some("test"));
        assert!(!client.is_watching());
    }

    #[tokio::test]
    async fn reset_keeps_the_endpoint() {
        let client = unreachable();
        client.reset();
        assert_eq!(client.url(), "http://127.0.0.1:1");
        assert!(!client.is_available().await);
    }
}
