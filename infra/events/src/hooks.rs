use crate::error::HandlerError;
use crate::event::Lane;
use tracing::{error, trace};

/// Pluggable diagnostics sink for the dispatch engine.
///
/// Supplied at registry construction; the default implementation forwards to
/// `tracing`. Every method has a default body, so custom sinks override only
/// what they care about.
pub trait RegistryHooks: Send + Sync {
    /// Invoked for every dispatch while debug tracing is enabled.
    fn trace(&self, label: &str, lane: Lane, event_type: &str) {
        trace!(label, lane = %lane, event = event_type, "Invoking event");
    }

    /// A task-tick-lane handler or completion callback failed. The failing
    /// item was skipped; the rest of its batch still ran.
    fn on_async_handler_error(&self, error: &HandlerError) {
        error!(%error, "Async event invocation failed");
    }

    /// A frame-lane handler or completion callback failed. The failing item
    /// was skipped; the rest of its batch still ran.
    fn on_react_handler_error(&self, error: &HandlerError) {
        error!(%error, "React event invocation failed");
    }
}

/// Default hooks: everything goes to the `tracing` diagnostic stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHooks;

impl RegistryHooks for TracingHooks {}

/// Capability to suspend observer-side recomputation around a group of
/// dispatches and resolve it once at the end.
///
/// The frame-aligned lane runs each drained batch inside a single
/// [`BatchScope::run`] call. The surrounding UI framework supplies the real
/// implementation; the default is a pass-through.
pub trait BatchScope: Send + Sync {
    fn run(&self, body: &mut dyn FnMut());
}

/// Pass-through batch scope used when no UI framework is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBatchScope;

impl BatchScope for NoopBatchScope {
    fn run(&self, body: &mut dyn FnMut()) {
        body();
    }
}
