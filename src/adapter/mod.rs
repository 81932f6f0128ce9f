//! Adapters - concrete implementations of the ports.

pub mod demo;
pub mod log;
pub mod rpc;

pub use demo::StaticClient;
pub use log::{LogLoader, LogSink};
pub use rpc::JsonRpcClient;
