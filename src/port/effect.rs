//! Effect sink port.
//!
//! Dependent subsystems observe the monitor through the effects it emits.

use crate::domain::Effect;

/// Receiver of monitor effects.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - `emit` is called outside the monitor's state lock, but it should still
///   return quickly; spawn a task for anything slow
pub trait EffectSink: Send + Sync {
    fn emit(&self, effect: Effect);
}

/// Broadcasts effects to every registered sink, in registration order.
pub struct SinkRegistry {
    sinks: Vec<Box<dyn EffectSink>>,
}

impl SinkRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { sinks: vec![] }
    }

    /// Register a sink.
    pub fn register(&mut self, sink: Box<dyn EffectSink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EffectSink for SinkRegistry {
    fn emit(&self, effect: Effect) {
        for sink in &self.sinks {
            sink.emit(effect.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoadScope;
    use crate::testkit::RecordingSink;

    #[test]
    fn registry_broadcasts_to_all_sinks() {
        let first = RecordingSink::new();
        let second = RecordingSink::new();

        let mut registry = SinkRegistry::new();
        registry.register(Box::new(first.clone()));
        registry.register(Box::new(second.clone()));
        assert_eq!(registry.len(), 2);

        registry.emit(Effect::TriggerLoad(LoadScope::Full));

        assert_eq!(first.effects(), vec![Effect::TriggerLoad(LoadScope::Full)]);
        assert_eq!(second.effects(), vec![Effect::TriggerLoad(LoadScope::Full)]);
    }

    #[test]
    fn empty_registry_swallows_effects() {
        let registry = SinkRegistry::default();
        assert!(registry.is_empty());
        registry.emit(Effect::HoldLoading);
    }
}
