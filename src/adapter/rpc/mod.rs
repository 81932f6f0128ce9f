//! JSON-RPC adapter for Ethereum-style ledger daemons.

mod client;
mod dto;

pub use client::JsonRpcClient;
