//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`client`] - [`ScriptedClient`], a programmable
//!   [`RemoteClient`](crate::port::RemoteClient) with call counters.
//! - [`sink`] - [`RecordingSink`] and [`RecordingLoader`] for asserting on
//!   emitted effects and loader calls.
//! - [`config`] - Canonical monitor configurations.

pub mod client;
pub mod config;
pub mod sink;

pub use client::{
    Call, ScriptedClient, BLOCK_TIME_SECS, CLIENT_VERSION, GAS_PRICE, HASHRATE, LATEST_BLOCK,
    PEER_COUNT,
};
pub use sink::{LoaderCall, RecordingLoader, RecordingSink};
