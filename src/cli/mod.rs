//! Command-line interface definitions.

pub mod check;
pub mod run;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::adapter::{JsonRpcClient, LogLoader, LogSink, StaticClient};
use crate::app::{Bootstrapper, Config, Monitor};
use crate::port::{RemoteClient, SinkRegistry};

/// Ledgerwatch - connectivity and readiness monitor for a ledger client.
#[derive(Parser, Debug)]
#[command(name = "ledgerwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitor until interrupted
    Run(RunArgs),

    /// Poll the client once and print the connectivity snapshot
    Check(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Use the offline demo client and poll once
    #[arg(long)]
    pub demo: bool,
}

/// Pick the client for `config`: the demo client in demo mode, JSON-RPC
/// otherwise.
#[must_use]
pub fn build_client(config: &Config) -> Arc<dyn RemoteClient> {
    if config.monitor.demo_mode {
        Arc::new(StaticClient::new())
    } else {
        Arc::new(JsonRpcClient::from_config(&config.rpc))
    }
}

/// Wire a monitor that logs every effect and drives a log-only loader.
#[must_use]
pub fn build_monitor(config: &Config) -> Monitor {
    let mut sinks = SinkRegistry::new();
    sinks.register(Box::new(LogSink));
    sinks.register(Box::new(Bootstrapper::new(Arc::new(LogLoader))));

    Monitor::new(build_client(config), Arc::new(sinks), config.monitor.clone())
}
