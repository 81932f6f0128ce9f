//! Effects emitted by the monitor for dependent subsystems.

use std::fmt;

use super::metrics::MetricsUpdate;
use super::status::ConnectionStatus;

/// How much dependent data a reload should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadScope {
    /// Addresses, then markets, then trades.
    Full,
    /// Addresses only, leaving markets and trades as they are.
    AddressesOnly,
}

impl LoadScope {
    #[must_use]
    pub const fn cascades(self) -> bool {
        matches!(self, Self::Full)
    }
}

/// An externally observable output of the monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Put dependent data (trades) into a loading state.
    HoldLoading,
    SetReady(bool),
    SetStatus(ConnectionStatus),
    SetMetrics(MetricsUpdate),
    /// Load-progress indicator, 0..=100.
    SetProgress(u8),
    TriggerLoad(LoadScope),
    /// Start of a full bootstrap: client configuration refresh before
    /// the full load.
    TriggerBootstrap,
    /// A new block arrived while ready: refresh the active user's and
    /// market's balances.
    RefreshBalances,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HoldLoading => f.write_str("HOLD_LOADING"),
            Self::SetReady(ready) => write!(f, "SET_READY({ready})"),
            Self::SetStatus(status) => write!(f, "SET_STATUS({status})"),
            Self::SetMetrics(update) => write!(f, "SET_METRICS({})", update.name()),
            Self::SetProgress(percent) => write!(f, "SET_PROGRESS({percent})"),
            Self::TriggerLoad(LoadScope::Full) => f.write_str("TRIGGER_LOAD(full)"),
            Self::TriggerLoad(LoadScope::AddressesOnly) => {
                f.write_str("TRIGGER_LOAD(addresses_only)")
            }
            Self::TriggerBootstrap => f.write_str("TRIGGER_BOOTSTRAP"),
            Self::RefreshBalances => f.write_str("REFRESH_BALANCES"),
        }
    }
}
