//! Dependent-data loader port.
//!
//! Declared mutation entry points of the stores that hold addresses,
//! markets, trades, and balances. The bootstrapper drives them in response
//! to monitor effects.

/// Entry points into the dependent data stores.
///
/// Calls are fire-and-forget: implementations spawn their own work.
pub trait DependentLoader: Send + Sync {
    /// Put trades into a loading state.
    fn hold_loading(&self);

    /// Update the load-progress indicator (0..=100).
    fn set_progress(&self, percent: u8);

    /// Publish the readiness gate to the stores.
    fn set_ready(&self, _ready: bool) {}

    /// Re-read client configuration before a full load.
    fn refresh_client(&self) {}

    /// Load user addresses. With `cascade`, loading addresses goes on to
    /// load markets and then trades.
    fn load_addresses(&self, cascade: bool);

    fn has_active_user(&self) -> bool;

    fn has_active_market(&self) -> bool;

    /// Refresh the active user's balance.
    fn update_balance(&self);

    /// Refresh the active user's balance in the active market.
    fn update_market_balance(&self);
}
