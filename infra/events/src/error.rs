use crate::event::EventType;
use std::borrow::Cow;

/// An error surfaced by a handler or completion callback.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during dispatch and registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The payload's reserved `"type"` tag disagrees with the fired type.
    /// The fire is aborted before any consumer or handler observes it.
    #[error("Reserved key conflict: event fired as `{fired}` but payload tagged {tagged}")]
    ReservedKeyConflict { fired: EventType, tagged: Cow<'static, str> },

    /// An event view was narrowed to a type it was not fired as.
    #[error("Mismatching event type. Expected `{expected}`, got `{actual}`")]
    TypeMismatch { expected: Cow<'static, str>, actual: EventType },

    /// The handler set is already registered on this registry.
    #[error("Handler set already registered")]
    AlreadyRegistered,

    /// The handler set was never registered on this registry.
    #[error("Handler set not registered")]
    NotRegistered,

    /// A replication relay is already attached to this registry.
    #[error("Relay already attached to this registry")]
    RelayAlreadyAttached,

    /// A synchronous handler failed; the remaining handler chain for this
    /// dispatch was interrupted.
    #[error("Handler failed for `{event_type}`: {source}")]
    Handler {
        event_type: EventType,
        #[source]
        source: HandlerError,
    },
}
