//! # Bridge
//!
//! Cross-context replication for the event registry: a [`BridgeAdapter`]
//! relays fired events between registries that share no memory, over a named
//! broadcast medium, without echoes.
//!
//! ## Overview
//!
//! A registry gains a bridge lazily through
//! [`BridgeRegistryExt::generate_bridge_descriptor`]; the returned
//! [`BridgeDescriptor`] names the shared channel and can be handed to
//! another context, which joins the same logical bus via
//! [`from_bridge_descriptor`]. The adapter and the registry are
//! independently constructed and wired here: the adapter receives only a
//! weak, lane-addressed [`DispatchHandle`], never the registry itself.
//!
//! Delivery guarantees are deliberately thin: frames arrive from untrusted,
//! asynchronous peers, and the origin-id check plus the per-adapter payload
//! stamp are the only echo/duplication protection. With three or more peers
//! on one channel an intermediate peer may re-forward a frame before
//! observing the stamp, so redundant (never infinite) delivery is possible.
//!
//! # Example
//!
//! ```rust,no_run
//! use patchbay_bridge::{BridgeRegistryExt, from_bridge_descriptor};
//! use patchbay_events::{Payload, Registry, observer};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), patchbay_bridge::BridgeError> {
//! let local = Registry::new();
//! let descriptor = local.generate_bridge_descriptor()?;
//!
//! // In another context, typically after deserializing the descriptor:
//! let peer = from_bridge_descriptor(&descriptor)?;
//! let _subscription = peer.on("ping", observer(|_| println!("ping crossed the bridge")));
//!
//! local.fire_later("ping", Payload::new())?;
//! # Ok(())
//! # }
//! ```

mod adapter;
mod error;
mod ids;
mod medium;
mod wire;

pub use adapter::BridgeAdapter;
pub use error::BridgeError;
pub use wire::BridgeMessage;

use patchbay_events::Registry;
use serde::{Deserialize, Serialize};

/// Names the shared broadcast channel a bridge is a peer on.
///
/// Two registries built from the same descriptor replicate each other's
/// events; serialize it to hand a bus to another context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeDescriptor {
    pub channel_id: String,
}

/// Bridge operations composed onto [`Registry`].
pub trait BridgeRegistryExt {
    /// Returns a descriptor for this registry's bridge, creating and
    /// attaching the adapter on first call (at most one per registry).
    ///
    /// # Errors
    /// Returns [`BridgeError::Attach`] if a relay raced this call and is
    /// already attached.
    fn generate_bridge_descriptor(&self) -> Result<BridgeDescriptor, BridgeError>;
}

impl BridgeRegistryExt for Registry {
    fn generate_bridge_descriptor(&self) -> Result<BridgeDescriptor, BridgeError> {
        if let Some(channel_id) = self.relay_channel() {
            return Ok(BridgeDescriptor { channel_id });
        }

        let adapter = BridgeAdapter::open(self.dispatch_handle(), None);
        let channel_id = adapter.channel_id().to_owned();
        self.attach_relay(adapter, channel_id.clone())?;
        Ok(BridgeDescriptor { channel_id })
    }
}

/// Builds a registry joined to the channel a descriptor names.
///
/// # Errors
/// Returns [`BridgeError::InvalidDescriptor`] if the channel id is empty.
pub fn from_bridge_descriptor(descriptor: &BridgeDescriptor) -> Result<Registry, BridgeError> {
    if descriptor.channel_id.trim().is_empty() {
        return Err(BridgeError::InvalidDescriptor {
            message: "channel id must not be empty".into(),
        });
    }

    let registry = Registry::new();
    let adapter = BridgeAdapter::open(registry.dispatch_handle(), Some(descriptor.channel_id.clone()));
    registry.attach_relay(adapter, descriptor.channel_id.clone())?;
    Ok(registry)
}
