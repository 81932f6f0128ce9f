//! Offline client for demo mode.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{Block, BlockId};
use crate::error::{Error, Result};
use crate::port::{BlockHandler, RemoteClient};

const DEMO_HEAD: u64 = 19_000_000;
const DEMO_BLOCK_TIME_SECS: u64 = 12;

/// Client that is always reachable and always reports a fresh chain head.
///
/// Never delivers block notifications.
#[derive(Debug, Default)]
pub struct StaticClient;

impl StaticClient {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RemoteClient for StaticClient {
    async fn is_available(&self) -> bool {
        true
    }

    async fn get_block(&self, id: BlockId) -> Result<Block> {
        let now = u64::try_from(Utc::now().timestamp())
            .map_err(|_| Error::Parse("system clock before epoch".into()))?;
        match id {
            BlockId::Latest => Ok(Block::new(DEMO_HEAD, now)),
            BlockId::Number(number) if number <= DEMO_HEAD => {
                let behind = (DEMO_HEAD - number).saturating_mul(DEMO_BLOCK_TIME_SECS);
                Ok(Block::new(number, now.saturating_sub(behind)))
            }
            BlockId::Number(number) => Err(Error::Parse(format!("block {number} not found"))),
        }
    }

    async fn client_version(&self) -> Result<String> {
        Ok(format!("ledgerwatch-demo/v{}", env!("CARGO_PKG_VERSION")))
    }

    async fn peer_count(&self) -> Result<u64> {
        Ok(0)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(1_000_000_000)
    }

    async fn mining(&self) -> Result<bool> {
        Ok(false)
    }

    async fn hashrate(&self) -> Result<u64> {
        Ok(0)
    }

    fn start_block_subscription(&self, _handler: BlockHandler) -> Result<()> {
        Ok(())
    }

    fn stop_block_subscription(&self, _reason: Option<&str>) {}

    fn reset(&self) {}

    fn name(&self) -> &'static str {
        "demo"
    }
}
