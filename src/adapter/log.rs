//! Log-only implementations of the effect and loader ports.

use tracing::{debug, info};

use crate::domain::{Effect, MetricsUpdate};
use crate::port::{DependentLoader, EffectSink};

/// Effect sink that writes every effect to the log.
pub struct LogSink;

impl EffectSink for LogSink {
    fn emit(&self, effect: Effect) {
        match effect {
            Effect::SetStatus(status) => info!(status = %status, "Connection status"),
            Effect::SetReady(ready) => info!(ready, "Readiness"),
            Effect::SetMetrics(MetricsUpdate::LatestBlock {
                number,
                date,
                chain_age,
            }) => {
                debug!(
                    block = number,
                    date = date.as_deref().unwrap_or("-"),
                    age_secs = chain_age.as_secs(),
                    "Latest block"
                );
            }
            Effect::SetMetrics(update) => debug!(?update, "Metric"),
            Effect::TriggerLoad(scope) => info!(?scope, "Reload requested"),
            other => debug!(effect = %other, "Effect"),
        }
    }
}

/// Loader used when no dependent stores are attached.
///
/// Logs each call. There is never an active user or market.
pub struct LogLoader;

impl DependentLoader for LogLoader {
    fn hold_loading(&self) {
        debug!("Holding trades in loading state");
    }

    fn set_progress(&self, percent: u8) {
        debug!(percent, "Load progress");
    }

    fn load_addresses(&self, cascade: bool) {
        info!(cascade, "Loading addresses");
    }

    fn has_active_user(&self) -> bool {
        false
    }

    fn has_active_market(&self) -> bool {
        false
    }

    fn update_balance(&self) {
        debug!("Updating balance");
    }

    fn update_market_balance(&self) {
        debug!("Updating market balance");
    }
}
