//! Facade crate for the patchbay event registry and bridge.
//! Re-exports the dispatch engine and cross-context replication layers.
//! Keep this crate thin: it should compose other crates, not implement dispatch logic.
//!
//! ## Usage
//! - Add `patchbay` and use the flat re-exports for the common path.
//! - Reach into [`events`] / [`bridge`] for the full module surfaces.

pub use patchbay_bridge as bridge;
pub use patchbay_events as events;

pub use patchbay_bridge::{BridgeDescriptor, BridgeError, BridgeRegistryExt, from_bridge_descriptor};
pub use patchbay_events::{
    BatchScope, Consumer, Event, EventType, Handler, HandlerSet, Lane, Payload, Registry,
    RegistryError, RegistryHooks, Subscription, handler, observer,
};
