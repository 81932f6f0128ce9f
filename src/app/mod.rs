//! Application layer - the monitor, its configuration, and orchestration.

mod bootstrap;
mod config;
mod monitor;
pub mod status_file;

pub use bootstrap::Bootstrapper;
pub use config::{Config, LogFormat, LoggingConfig, MonitorConfig, RpcConfig, RPC_URL_ENV};
pub use monitor::{Freshness, Monitor, MonitorHandle, Refresh, Tick, TickReport};
