//! Routes monitor effects to the dependent data stores.

use std::sync::Arc;

use tracing::debug;

use crate::domain::Effect;
use crate::port::{DependentLoader, EffectSink};

/// Effect sink that drives a [`DependentLoader`].
///
/// Holds no state of its own; every decision is the monitor's.
pub struct Bootstrapper {
    loader: Arc<dyn DependentLoader>,
}

impl Bootstrapper {
    #[must_use]
    pub fn new(loader: Arc<dyn DependentLoader>) -> Self {
        Self { loader }
    }
}

impl EffectSink for Bootstrapper {
    fn emit(&self, effect: Effect) {
        match effect {
            Effect::HoldLoading => self.loader.hold_loading(),
            Effect::SetReady(ready) => self.loader.set_ready(ready),
            Effect::SetProgress(percent) => self.loader.set_progress(percent),
            Effect::TriggerBootstrap => self.loader.refresh_client(),
            Effect::TriggerLoad(scope) => {
                debug!(?scope, "Reloading dependent data");
                self.loader.load_addresses(scope.cascades());
            }
            Effect::RefreshBalances => {
                if self.loader.has_active_user() {
                    self.loader.update_balance();
                }
                if self.loader.has_active_market() {
                    self.loader.update_market_balance();
                }
            }
            Effect::SetStatus(_) | Effect::SetMetrics(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionStatus, LoadScope};
    use crate::testkit::{LoaderCall, RecordingLoader};

    fn bootstrapper(loader: &RecordingLoader) -> Bootstrapper {
        Bootstrapper::new(Arc::new(loader.clone()))
    }

    #[test]
    fn full_bootstrap_cascades() {
        let loader = RecordingLoader::new();
        let sink = bootstrapper(&loader);

        for effect in [
            Effect::HoldLoading,
            Effect::SetReady(true),
            Effect::SetProgress(0),
            Effect::TriggerBootstrap,
            Effect::TriggerLoad(LoadScope::Full),
        ] {
            sink.emit(effect);
        }

        assert_eq!(
            loader.calls(),
            vec![
                LoaderCall::HoldLoading,
                LoaderCall::SetReady(true),
                LoaderCall::SetProgress(0),
                LoaderCall::RefreshClient,
                LoaderCall::LoadAddresses { cascade: true },
            ]
        );
    }

    #[test]
    fn stale_reload_touches_addresses_only() {
        let loader = RecordingLoader::new();
        bootstrapper(&loader).emit(Effect::TriggerLoad(LoadScope::AddressesOnly));
        assert_eq!(
            loader.calls(),
            vec![LoaderCall::LoadAddresses { cascade: false }]
        );
    }

    #[test]
    fn balances_follow_active_user_and_market() {
        let nobody = RecordingLoader::new();
        bootstrapper(&nobody).emit(Effect::RefreshBalances);
        assert!(nobody.calls().is_empty());

        let user_only = RecordingLoader::new().with_active_user();
        bootstrapper(&user_only).emit(Effect::RefreshBalances);
        assert_eq!(user_only.calls(), vec![LoaderCall::UpdateBalance]);

        let both = RecordingLoader::new().with_active_user().with_active_market();
        bootstrapper(&both).emit(Effect::RefreshBalances);
        assert_eq!(
            both.calls(),
            vec![LoaderCall::UpdateBalance, LoaderCall::UpdateMarketBalance]
        );
    }

    #[test]
    fn status_changes_are_not_routed() {
        let loader = RecordingLoader::new();
        bootstrapper(&loader).emit(Effect::SetStatus(ConnectionStatus::Connected));
        assert!(loader.calls().is_empty());
    }
}
