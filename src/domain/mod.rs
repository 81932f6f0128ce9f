//! Transport-agnostic domain types for ledger connectivity.

mod block;
mod effect;
mod metrics;
mod state;
mod status;

pub use block::{Block, BlockId};
pub use effect::{Effect, LoadScope};
pub use metrics::{MetricsUpdate, NetworkMetrics};
pub use state::{ConnectivitySnapshot, ConnectivityState};
pub use status::ConnectionStatus;
