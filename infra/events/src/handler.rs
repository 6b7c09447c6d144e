use crate::error::HandlerError;
use crate::event::{Event, EventType, IntoEventTypes};
use std::sync::Arc;

/// Outcome of a single handler invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// A registered event handler.
///
/// Handlers are identity-comparable: removal matches the same `Arc` clone
/// that was registered (`Arc::ptr_eq`). Registering one clone twice for the
/// same type yields two invocations per fire; there is no implicit
/// de-duplication.
pub type Handler = Arc<dyn Fn(&Event) -> HandlerResult + Send + Sync + 'static>;

/// Callback invoked after a deferred item's handlers have run.
pub type CompletionCallback = Box<dyn FnOnce() -> HandlerResult + Send + 'static>;

/// Wraps a fallible closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&Event) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps an infallible closure into a [`Handler`].
pub fn observer<F>(f: F) -> Handler
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    Arc::new(move |event| {
        f(event);
        Ok(())
    })
}

/// An explicit table mapping event types to bound handlers, built once per
/// participant and consumed by [`Registry::register_handler`].
///
/// Identity for registration bookkeeping is the set itself: registering the
/// same `HandlerSet` (any clone of it) twice fails with `AlreadyRegistered`.
///
/// [`Registry::register_handler`]: crate::Registry::register_handler
#[derive(Clone)]
pub struct HandlerSet {
    entries: Arc<Vec<(EventType, Handler)>>,
}

impl HandlerSet {
    #[must_use]
    pub fn builder() -> HandlerSetBuilder {
        HandlerSetBuilder { entries: Vec::new() }
    }

    /// Stable identity of this set, shared by all clones.
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.entries) as usize
    }

    pub(crate) fn entries(&self) -> &[(EventType, Handler)] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet").field("entries", &self.entries.len()).finish()
    }
}

/// Builder collecting `event type -> bound handler` entries.
#[derive(Default)]
pub struct HandlerSetBuilder {
    entries: Vec<(EventType, Handler)>,
}

impl HandlerSetBuilder {
    /// Binds a handler to one or more event types.
    #[must_use = "The builder must be finished with `build` to produce a handler set"]
    pub fn handle(mut self, types: impl IntoEventTypes, handler: Handler) -> Self {
        for event_type in types.into_event_types() {
            self.entries.push((event_type, handler.clone()));
        }
        self
    }

    /// Binds an infallible closure to one or more event types.
    #[must_use = "The builder must be finished with `build` to produce a handler set"]
    pub fn observe<F>(self, types: impl IntoEventTypes, f: F) -> Self
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.handle(types, observer(f))
    }

    #[must_use]
    pub fn build(self) -> HandlerSet {
        HandlerSet { entries: Arc::new(self.entries) }
    }
}

impl std::fmt::Debug for HandlerSetBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSetBuilder").field("entries", &self.entries.len()).finish()
    }
}
