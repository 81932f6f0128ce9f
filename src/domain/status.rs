//! Connection status of the remote ledger client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Last observed reachability of the remote client.
///
/// `Unknown` is the state before the first availability check. For
/// transition purposes it counts as down, so the first successful check
/// always runs the connect path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Failed,
}

impl ConnectionStatus {
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Whether a tick observing this status should treat the client as
    /// having been down.
    #[must_use]
    pub const fn is_down(self) -> bool {
        !self.is_connected()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Connected => "connected",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
