//! Block headers as seen by the monitor.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Which block to fetch from the remote client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockId {
    Latest,
    Number(u64),
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// The subset of a block header the monitor cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
}

impl Block {
    #[must_use]
    pub const fn new(number: u64, timestamp: u64) -> Self {
        Self { number, timestamp }
    }

    /// The block preceding this one, if any worth fetching for block time.
    ///
    /// Blocks 0 and 1 have no meaningful predecessor interval.
    #[must_use]
    pub fn previous_id(&self) -> Option<BlockId> {
        (self.number > 1).then(|| BlockId::Number(self.number - 1))
    }

    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Wall-clock time elapsed between this block's timestamp and `now`.
    ///
    /// Blocks stamped in the future have an age of zero.
    #[must_use]
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        let now_ms = now.timestamp_millis();
        let block_ms = i64::try_from(self.timestamp)
            .ok()
            .and_then(|secs| secs.checked_mul(1000))
            .unwrap_or(i64::MAX);
        let age_ms = now_ms.saturating_sub(block_ms).max(0);
        Duration::from_millis(age_ms as u64)
    }

    /// Seconds between `previous` and this block.
    #[must_use]
    pub fn interval_since(&self, previous: &Block) -> u64 {
        self.timestamp.saturating_sub(previous.timestamp)
    }

    /// Human-readable block date, e.g. `Oct 17th, 14:03` (UTC).
    #[must_use]
    pub fn display_date(&self) -> Option<String> {
        self.time().map(|time| {
            let day = time.day();
            format!(
                "{} {day}{}, {}",
                time.format("%b"),
                ordinal_suffix(day),
                time.format("%H:%M")
            )
        })
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn previous_id_skips_genesis_blocks() {
        assert_eq!(Block::new(0, 0).previous_id(), None);
        assert_eq!(Block::new(1, 0).previous_id(), None);
        assert_eq!(Block::new(2, 0).previous_id(), Some(BlockId::Number(1)));
    }

    #[test]
    fn age_is_elapsed_wall_clock_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let block = Block::new(10, (now.timestamp() - 90) as u64);
        assert_eq!(block.age_at(now), Duration::from_secs(90));
    }

    #[test]
    fn future_block_has_zero_age() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let block = Block::new(10, (now.timestamp() + 30) as u64);
        assert_eq!(block.age_at(now), Duration::ZERO);
    }

    #[test]
    fn interval_never_underflows() {
        let latest = Block::new(11, 100);
        assert_eq!(latest.interval_since(&Block::new(10, 88)), 12);
        assert_eq!(latest.interval_since(&Block::new(10, 120)), 0);
    }

    #[test]
    fn display_date_uses_ordinal_day() {
        let ts = Utc.with_ymd_and_hms(2024, 10, 1, 9, 5, 0).unwrap().timestamp();
        assert_eq!(
            Block::new(1, ts as u64).display_date().as_deref(),
            Some("Oct 1st, 09:05")
        );

        let ts = Utc.with_ymd_and_hms(2024, 10, 12, 23, 59, 0).unwrap().timestamp();
        assert_eq!(
            Block::new(1, ts as u64).display_date().as_deref(),
            Some("Oct 12th, 23:59")
        );
    }
}
