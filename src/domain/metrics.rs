//! Network metric snapshot and the partial updates that feed it.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Last-known metrics reported by the remote client.
///
/// Every field is `None` until its first successful fetch and keeps its
/// previous value when a later fetch fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMetrics {
    pub block_number: Option<u64>,
    pub block_date: Option<String>,
    /// Seconds between the latest block and its predecessor.
    pub block_time_secs: Option<u64>,
    pub peer_count: Option<u64>,
    /// Gas price in wei.
    pub gas_price: Option<u128>,
    pub mining: Option<bool>,
    /// Hashes per second.
    pub hashrate: Option<u64>,
    pub client_version: Option<String>,
}

/// A single metric result, applied independently as it arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsUpdate {
    LatestBlock {
        number: u64,
        date: Option<String>,
        chain_age: Duration,
    },
    /// Seconds between block `number` and its predecessor.
    BlockTime { number: u64, secs: u64 },
    ClientVersion(String),
    PeerCount(u64),
    GasPrice(u128),
    Mining(bool),
    Hashrate(u64),
}

impl MetricsUpdate {
    /// Metric name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LatestBlock { .. } => "latest_block",
            Self::BlockTime { .. } => "block_time",
            Self::ClientVersion(_) => "client_version",
            Self::PeerCount(_) => "peer_count",
            Self::GasPrice(_) => "gas_price",
            Self::Mining(_) => "mining",
            Self::Hashrate(_) => "hashrate",
        }
    }
}

impl NetworkMetrics {
    /// Fold one update into the snapshot. The chain age carried by
    /// `LatestBlock` is owned by the connectivity state, not stored here.
    pub fn apply(&mut self, update: &MetricsUpdate) {
        match update {
            MetricsUpdate::LatestBlock { number, date, .. } => {
                self.block_number = Some(*number);
                if date.is_some() {
                    self.block_date.clone_from(date);
                }
            }
            MetricsUpdate::BlockTime { secs, .. } => self.block_time_secs = Some(*secs),
            MetricsUpdate::ClientVersion(version) => self.client_version = Some(version.clone()),
            MetricsUpdate::PeerCount(count) => self.peer_count = Some(*count),
            MetricsUpdate::GasPrice(price) => self.gas_price = Some(*price),
            MetricsUpdate::Mining(mining) => self.mining = Some(*mining),
            MetricsUpdate::Hashrate(rate) => self.hashrate = Some(*rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_touches_only_the_updated_field() {
        let mut metrics = NetworkMetrics {
            peer_count: Some(8),
            ..Default::default()
        };

        metrics.apply(&MetricsUpdate::GasPrice(20_000_000_000));

        assert_eq!(metrics.gas_price, Some(20_000_000_000));
        assert_eq!(metrics.peer_count, Some(8));
        assert_eq!(metrics.block_number, None);
    }

    #[test]
    fn latest_block_without_date_keeps_previous_date() {
        let mut metrics = NetworkMetrics {
            block_date: Some("Oct 1st, 09:05".into()),
            ..Default::default()
        };

        metrics.apply(&MetricsUpdate::LatestBlock {
            number: 42,
            date: None,
            chain_age: Duration::from_secs(3),
        });

        assert_eq!(metrics.block_number, Some(42));
        assert_eq!(metrics.block_date.as_deref(), Some("Oct 1st, 09:05"));
    }
}
