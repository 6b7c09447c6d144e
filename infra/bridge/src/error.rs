use patchbay_events::RegistryError;
use std::borrow::Cow;

/// Errors that can occur while wiring a registry to the bridge medium.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The descriptor does not name a usable channel.
    #[error("Invalid bridge descriptor: {message}")]
    InvalidDescriptor { message: Cow<'static, str> },

    /// The registry rejected the adapter attachment.
    #[error("Bridge attachment rejected: {source}")]
    Attach {
        #[from]
        source: RegistryError,
    },
}
