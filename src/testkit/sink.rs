//! Recording implementations of the effect and loader ports.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::Effect;
use crate::port::{DependentLoader, EffectSink};

/// Collects every emitted effect, in order. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSink {
    effects: Arc<Mutex<Vec<Effect>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects.lock().clone()
    }

    pub fn contains(&self, effect: &Effect) -> bool {
        self.effects.lock().contains(effect)
    }

    /// Index of the first occurrence of `effect`.
    pub fn position(&self, effect: &Effect) -> Option<usize> {
        self.effects.lock().iter().position(|e| e == effect)
    }

    pub fn len(&self) -> usize {
        self.effects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.lock().is_empty()
    }

    pub fn clear(&self) {
        self.effects.lock().clear();
    }
}

impl EffectSink for RecordingSink {
    fn emit(&self, effect: Effect) {
        self.effects.lock().push(effect);
    }
}

/// A call received by [`RecordingLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderCall {
    HoldLoading,
    SetProgress(u8),
    SetReady(bool),
    RefreshClient,
    LoadAddresses { cascade: bool },
    UpdateBalance,
    UpdateMarketBalance,
}

/// Records loader calls. Active user and market are configurable.
#[derive(Clone, Default)]
pub struct RecordingLoader {
    calls: Arc<Mutex<Vec<LoaderCall>>>,
    active_user: bool,
    active_market: bool,
}

impl RecordingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active_user(mut self) -> Self {
        self.active_user = true;
        self
    }

    pub fn with_active_market(mut self) -> Self {
        self.active_market = true;
        self
    }

    pub fn calls(&self) -> Vec<LoaderCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: LoaderCall) {
        self.calls.lock().push(call);
    }
}

impl DependentLoader for RecordingLoader {
    fn hold_loading(&self) {
        self.record(LoaderCall::HoldLoading);
    }

    fn set_progress(&self, percent: u8) {
        self.record(LoaderCall::SetProgress(percent));
    }

    fn set_ready(&self, ready: bool) {
        self.record(LoaderCall::SetReady(ready));
    }

    fn refresh_client(&self) {
        self.record(LoaderCall::RefreshClient);
    }

    fn load_addresses(&self, cascade: bool) {
        self.record(LoaderCall::LoadAddresses { cascade });
    }

    fn has_active_user(&self) -> bool {
        self.active_user
    }

    fn has_active_market(&self) -> bool {
        self.active_market
    }

    fn update_balance(&self) {
        self.record(LoaderCall::UpdateBalance);
    }

    fn update_market_balance(&self) {
        self.record(LoaderCall::UpdateMarketBalance);
    }
}
