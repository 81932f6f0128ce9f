//! Remote ledger client port.
//!
//! The monitor talks to the ledger daemon exclusively through this trait.
//! Transport, encoding, and retries are the adapter's business.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Block, BlockId};
use crate::error::Result;

/// Callback invoked by the client whenever it observes a new block.
///
/// Must return quickly; the monitor spawns its own work from it.
pub type BlockHandler = Arc<dyn Fn() + Send + Sync>;

/// Capability interface of a remote ledger client.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Whether the daemon is currently reachable.
    async fn is_available(&self) -> bool;

    async fn get_block(&self, id: BlockId) -> Result<Block>;

    /// Client implementation and version string.
    async fn client_version(&self) -> Result<String>;

    async fn peer_count(&self) -> Result<u64>;

    /// Gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    async fn mining(&self) -> Result<bool>;

    async fn hashrate(&self) -> Result<u64>;

    /// Register the block-arrival handler.
    ///
    /// Registration is local bookkeeping and must not block.
    fn start_block_subscription(&self, handler: BlockHandler) -> Result<()>;

    /// Deregister the block-arrival handler. `reason` is diagnostic only.
    fn stop_block_subscription(&self, reason: Option<&str>);

    /// Drop and re-create the underlying connection.
    fn reset(&self);

    /// Client name for logging.
    fn name(&self) -> &'static str;
}
