//! Ledgerwatch - connectivity and readiness monitor for a remote ledger client.
//!
//! This crate watches a ledger daemon, tracks whether it is reachable and
//! whether its chain data is fresh, and derives a single readiness signal
//! that gates loading of dependent data (addresses, markets, trades,
//! balances).
//!
//! # Architecture
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - **`domain`** - Connection status, blocks, metrics, and the effects the
//!   monitor emits
//! - **`port`** - Traits at the seams: `RemoteClient`, `EffectSink`,
//!   `DependentLoader`
//! - **`adapter`** - JSON-RPC and demo clients, log-only sink and loader
//! - **`app`** - The monitor itself, configuration, the bootstrapper, and
//!   the status file
//!
//! # Modules
//!
//! - [`app`] - Monitor, configuration loading, effect routing
//! - [`adapter`] - Concrete client and sink implementations
//! - [`cli`] - Command-line interface
//! - [`domain`] - Exchange-agnostic types and state
//! - [`error`] - Error types for the crate
//! - [`port`] - Trait definitions
//!
//! # Features
//!
//! - `testkit` - Expose scripted clients and recording sinks for integration
//!   tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ledgerwatch::adapter::{JsonRpcClient, LogSink};
//! use ledgerwatch::app::{Config, Monitor};
//!
//! # async fn demo() -> ledgerwatch::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let client = Arc::new(JsonRpcClient::from_config(&config.rpc));
//! let monitor = Monitor::new(client, Arc::new(LogSink), config.monitor.clone());
//! let handle = monitor.spawn();
//! handle.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
