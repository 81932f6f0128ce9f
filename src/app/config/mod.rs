//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with an environment variable
//! override for the RPC endpoint (`LEDGERWATCH_RPC_URL`).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

mod logging;
mod monitor;
mod rpc;

pub use logging::{LogFormat, LoggingConfig};
pub use monitor::MonitorConfig;
pub use rpc::RpcConfig;

/// Environment variable that overrides `rpc.url`.
pub const RPC_URL_ENV: &str = "LEDGERWATCH_RPC_URL";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Path to the status file for external monitoring.
    /// Set to enable status file writing (e.g., "/var/run/ledgerwatch/status.json").
    #[serde(default)]
    pub status_file: Option<PathBuf>,
}

impl Config {
    /// Read, override from the environment, and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var(RPC_URL_ENV) {
            config.rpc.url = url;
        }

        config.validate()?;

        Ok(config)
    }

    /// Parse and validate a TOML document without consulting the environment.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.rpc.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "rpc.url" }.into());
        }
        url::Url::parse(&self.rpc.url).map_err(|e| ConfigError::InvalidValue {
            field: "rpc.url",
            reason: e.to_string(),
        })?;
        if self.monitor.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.poll_interval_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.rpc.block_poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "rpc.block_poll_interval_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
