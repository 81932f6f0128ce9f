//! Programmable [`RemoteClient`] for testing.
//!
//! [`ScriptedClient`] serves a synthetic chain whose head can be aged and
//! advanced, lets individual calls fail or hang, and counts the calls the
//! monitor makes.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::{Block, BlockId};
use crate::error::{Error, Result};
use crate::port::{BlockHandler, RemoteClient};

/// Head block number of a freshly built client.
pub const LATEST_BLOCK: u64 = 1_000;
/// Seconds between consecutive synthetic blocks.
pub const BLOCK_TIME_SECS: u64 = 12;
pub const CLIENT_VERSION: &str = "Geth/v1.13.15-stable/linux-amd64/go1.21.6";
pub const PEER_COUNT: u64 = 25;
pub const GAS_PRICE: u128 = 20_000_000_000;
pub const HASHRATE: u64 = 1_500_000;

/// Remote calls that can be scripted to fail or hang.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    LatestBlock,
    PreviousBlock,
    ClientVersion,
    PeerCount,
    GasPrice,
    Mining,
    Hashrate,
}

pub struct ScriptedClient {
    available: AtomicBool,
    latest: Mutex<Block>,
    failing: Mutex<HashSet<Call>>,
    stalled: Mutex<HashSet<Call>>,
    delays: Mutex<HashMap<Call, Duration>>,
    handler: Mutex<Option<BlockHandler>>,
    reject_next_subscription: AtomicBool,
    stop_reasons: Mutex<Vec<Option<String>>>,
    availability_checks: AtomicU32,
    block_fetches: AtomicU32,
    start_calls: AtomicU32,
    reset_calls: AtomicU32,
}

fn aged_block(number: u64, age: Duration) -> Block {
    let now = u64::try_from(Utc::now().timestamp()).unwrap_or(0);
    Block::new(number, now.saturating_sub(age.as_secs()))
}

impl ScriptedClient {
    /// Available client whose head block was produced just now.
    pub fn fresh() -> Self {
        Self::with_chain_age(Duration::ZERO)
    }

    /// Available client whose head block is `age` old.
    pub fn with_chain_age(age: Duration) -> Self {
        Self {
            available: AtomicBool::new(true),
            latest: Mutex::new(aged_block(LATEST_BLOCK, age)),
            failing: Mutex::new(HashSet::new()),
            stalled: Mutex::new(HashSet::new()),
            delays: Mutex::new(HashMap::new()),
            handler: Mutex::new(None),
            reject_next_subscription: AtomicBool::new(false),
            stop_reasons: Mutex::new(Vec::new()),
            availability_checks: AtomicU32::new(0),
            block_fetches: AtomicU32::new(0),
            start_calls: AtomicU32::new(0),
            reset_calls: AtomicU32::new(0),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_latest(&self, block: Block) {
        *self.latest.lock() = block;
    }

    /// Produce the next block, stamped `age` ago.
    pub fn advance_chain(&self, age: Duration) {
        let mut latest = self.latest.lock();
        *latest = aged_block(latest.number + 1, age);
    }

    /// Make `call` fail until [`recover`](Self::recover) is called.
    pub fn fail(&self, call: Call) {
        self.failing.lock().insert(call);
    }

    pub fn recover(&self, call: Call) {
        self.failing.lock().remove(&call);
    }

    /// Make `call` never resolve.
    pub fn stall(&self, call: Call) {
        self.stalled.lock().insert(call);
    }

    /// Make every `call` take `delay` before answering.
    pub fn delay(&self, call: Call, delay: Duration) {
        self.delays.lock().insert(call, delay);
    }

    /// Reject the next block subscription registration.
    pub fn reject_next_subscription(&self) {
        self.reject_next_subscription.store(true, Ordering::SeqCst);
    }

    /// Invoke the registered block handler, as the daemon would on a new
    /// block. Returns `false` if nothing is registered.
    pub fn push_block(&self) -> bool {
        let handler = self.handler.lock().clone();
        match handler {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    pub fn availability_checks(&self) -> u32 {
        self.availability_checks.load(Ordering::SeqCst)
    }

    /// Number of `get_block` calls, latest and previous combined.
    pub fn block_fetches(&self) -> u32 {
        self.block_fetches.load(Ordering::SeqCst)
    }

    /// Number of subscription registration attempts.
    pub fn start_calls(&self) -> u32 {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) -> u32 {
        self.reset_calls.load(Ordering::SeqCst)
    }

    /// Handlers currently registered (0 or 1).
    pub fn active_registrations(&self) -> usize {
        usize::from(self.handler.lock().is_some())
    }

    pub fn stop_reasons(&self) -> Vec<Option<String>> {
        self.stop_reasons.lock().clone()
    }

    async fn outcome(&self, call: Call) -> Result<()> {
        let stalled = self.stalled.lock().contains(&call);
        if stalled {
            std::future::pending::<()>().await;
        }
        let delay = self.delays.lock().get(&call).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failing.lock().contains(&call);
        if failing {
            return Err(Error::Connection(format!("scripted {call:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteClient for ScriptedClient {
    async fn is_available(&self) -> bool {
        self.availability_checks.fetch_add(1, Ordering::SeqCst);
        self.available.load(Ordering::SeqCst)
    }

    async fn get_block(&self, id: BlockId) -> Result<Block> {
        self.block_fetches.fetch_add(1, Ordering::SeqCst);
        let call = match id {
            BlockId::Latest => Call::LatestBlock,
            BlockId::Number(_) => Call::PreviousBlock,
        };
        self.outcome(call).await?;

        let latest = *self.latest.lock();
        match id {
            BlockId::Latest => Ok(latest),
            BlockId::Number(number) if number <= latest.number => {
                let behind = latest.number - number;
                Ok(Block::new(
                    number,
                    latest
                        .timestamp
                        .saturating_sub(behind * BLOCK_TIME_SECS),
                ))
            }
            BlockId::Number(number) => Err(Error::Parse(format!("unknown block {number}"))),
        }
    }

    async fn client_version(&self) -> Result<String> {
        self.outcome(Call::ClientVersion).await?;
        Ok(CLIENT_VERSION.to_string())
    }

    async fn peer_count(&self) -> Result<u64> {
        self.outcome(Call::PeerCount).await?;
        Ok(PEER_COUNT)
    }

    async fn gas_price(&self) -> Result<u128> {
        self.outcome(Call::GasPrice).await?;
        Ok(GAS_PRICE)
    }

    async fn mining(&self) -> Result<bool> {
        self.outcome(Call::Mining).await?;
        Ok(false)
    }

    async fn hashrate(&self) -> Result<u64> {
        self.outcome(Call::Hashrate).await?;
        Ok(HASHRATE)
    }

    fn start_block_subscription(&self, handler: BlockHandler) -> Result<()> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_next_subscription.swap(false, Ordering::SeqCst) {
            return Err(Error::Subscription("scripted rejection".into()));
        }
        *self.handler.lock() = Some(handler);
        Ok(())
    }

    fn stop_block_subscription(&self, reason: Option<&str>) {
        self.stop_reasons.lock().push(reason.map(str::to_string));
        *self.handler.lock() = None;
    }

    fn reset(&self) {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
