//! Ports - the traits the monitor depends on and exposes.

mod client;
mod effect;
mod loader;

pub use client::{BlockHandler, RemoteClient};
pub use effect::{EffectSink, SinkRegistry};
pub use loader::DependentLoader;
