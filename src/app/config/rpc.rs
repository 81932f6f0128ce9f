//! JSON-RPC endpoint settings.

use serde::Deserialize;

/// Connection settings for the ledger daemon's JSON-RPC endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// HTTP endpoint. Overridden by `LEDGERWATCH_RPC_URL`.
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-request timeout (default: 5000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// TCP connect timeout (default: 2000).
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// How often the block subscription checks for a new head (default: 1000).
    #[serde(default = "default_block_poll_interval_ms")]
    pub block_poll_interval_ms: u64,
}

fn default_url() -> String {
    "http://127.0.0.1:8545".into()
}

const fn default_timeout_ms() -> u64 {
    5000
}

const fn default_connect_timeout_ms() -> u64 {
    2000
}

const fn default_block_poll_interval_ms() -> u64 {
    1000
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            block_poll_interval_ms: default_block_poll_interval_ms(),
        }
    }
}
