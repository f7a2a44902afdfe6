/// Abstraction over event delivery. Implementers decide where the registry's
/// notifications go (log stream, message bus, test recorder).
use crate::types::RegistryEvent;

pub trait EventSink: Send + Sync {
    /// Deliver one event. Called after the corresponding state change has
    /// been committed; the return is ignored so sinks cannot veto anything.
    fn emit(&self, event: &RegistryEvent);
}

/// Sink that drops every event. For embedders that do not subscribe.
#[derive(Default)]
pub struct NopSink;

impl EventSink for NopSink {
    fn emit(&self, _event: &RegistryEvent) {}
}
