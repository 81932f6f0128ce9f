//! Block-arrival subscription lifecycle.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Monitor, Refresh};
use crate::domain::Effect;
use crate::port::BlockHandler;

impl Monitor {
    /// Register the block-arrival handler unless one is already registered.
    ///
    /// Returns `true` if this call registered it. A failed registration
    /// leaves the subscription inactive so the next call retries.
    pub fn start_subscription(&self) -> bool {
        if !self.inner.state.lock().claim_subscription() {
            debug!("Block subscription already active");
            return false;
        }

        match self
            .inner
            .client
            .start_block_subscription(self.block_handler())
        {
            Ok(()) => {
                info!(client = self.client_name(), "Block subscription started");
                true
            }
            Err(e) => {
                self.inner.state.lock().release_subscription();
                warn!(error = %e, "Failed to start block subscription");
                false
            }
        }
    }

    /// Deregister the block-arrival handler if one is registered.
    ///
    /// `reason` is passed through to the client for diagnostics.
    pub fn stop_subscription(&self, reason: Option<&str>) -> bool {
        if !self.inner.state.lock().release_subscription() {
            debug!("Block subscription already inactive");
            return false;
        }

        self.inner.client.stop_block_subscription(reason);
        info!(
            client = self.client_name(),
            reason = reason.unwrap_or("none"),
            "Block subscription stopped"
        );
        true
    }

    /// Reset the client's connection, then make sure we are subscribed.
    pub fn reset(&self) {
        warn!(client = self.client_name(), "Resetting ledger client connection");
        self.inner.client.reset();
        self.start_subscription();
    }

    /// React to a pushed block: refresh metrics and, when ready, ask for
    /// the active user's and market's balances to be refreshed.
    pub fn on_new_block(&self) -> Refresh {
        debug!("New block observed");
        let refresh = self.refresh();
        if self.is_ready() {
            self.emit(Effect::RefreshBalances);
        }
        refresh
    }

    fn block_handler(&self) -> BlockHandler {
        let monitor = Arc::downgrade(&self.inner);
        Arc::new(move || {
            let Some(inner) = monitor.upgrade() else {
                return;
            };
            if tokio::runtime::Handle::try_current().is_err() {
                warn!("Block notification outside a Tokio runtime, ignoring");
                return;
            }
            let _detached = Monitor { inner }.on_new_block();
        })
    }
}
