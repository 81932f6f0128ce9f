use std::sync::Arc;

use ledgerwatch::app::{Bootstrapper, Monitor};
use ledgerwatch::port::SinkRegistry;
use ledgerwatch::testkit::{self, RecordingLoader, RecordingSink, ScriptedClient};

pub const TIMEOUT_SECS: u64 = 120;

/// Monitor over `client` that records its effects.
pub fn recorded(client: &Arc<ScriptedClient>) -> (Monitor, RecordingSink) {
    let sink = RecordingSink::new();
    let monitor = Monitor::new(
        client.clone(),
        Arc::new(sink.clone()),
        testkit::config::monitor(TIMEOUT_SECS),
    );
    (monitor, sink)
}

/// Monitor over `client` driving `loader` through a bootstrapper, with the
/// raw effects recorded alongside.
pub fn bootstrapped(
    client: &Arc<ScriptedClient>,
    loader: &RecordingLoader,
) -> (Monitor, RecordingSink) {
    let sink = RecordingSink::new();
    let mut registry = SinkRegistry::new();
    registry.register(Box::new(sink.clone()));
    registry.register(Box::new(Bootstrapper::new(Arc::new(loader.clone()))));

    let monitor = Monitor::new(
        client.clone(),
        Arc::new(registry),
        testkit::config::monitor(TIMEOUT_SECS),
    );
    (monitor, sink)
}
