//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Level for this crate's events (default: "info").
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".into()
}

impl LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset. Dependencies stay at
    /// `warn` so HTTP internals do not drown the monitor's own events.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("warn,ledgerwatch={}", self.level)
    }

    /// Install the global tracing subscriber. `RUST_LOG` takes precedence
    /// over the configured level.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directive()));
        let builder = fmt().with_env_filter(filter);

        match self.format {
            LogFormat::Json => builder.json().init(),
            LogFormat::Pretty => builder.with_target(false).init(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}
