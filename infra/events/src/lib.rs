//! # Event Registry
//!
//! An in-process event bus that decouples producers from consumers, with one
//! synchronous and two deferred dispatch lanes.
//!
//! ## Overview
//!
//! A [`Registry`] maps event types to ordered handler lists (one-shot,
//! persistent, and generic) and dispatches fired events on one of three
//! lanes: `fire` runs handlers on the caller's stack, `fire_later` batches
//! them onto the next task-queue tick, and `fire_react` batches them past
//! the next frame boundary inside a batched-update scope. Registered
//! [`Consumer`]s observe every fire before local handlers run, which is the
//! seam cross-context replication plugs into.
//!
//! ## Features
//!
//! * **Ordered dispatch**: one-shot, then persistent, then generic; within a
//!   category, registration order.
//! * **Snapshot semantics**: registrations and removals made by a handler
//!   affect only future dispatches.
//! * **Batched deferred lanes**: calls before a drain share one drain; each
//!   drained item is an independent failure domain.
//! * **Injected diagnostics**: a [`RegistryHooks`] sink and a [`BatchScope`]
//!   capability, both constructor-supplied with `tracing`-backed and
//!   pass-through defaults.
//!
//! # Example
//!
//! ```rust
//! use patchbay_events::{Payload, Registry, observer};
//! use serde_json::json;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), patchbay_events::RegistryError> {
//! let registry = Registry::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//!
//! let counter = seen.clone();
//! let _subscription = registry.on("tick", observer(move |event| {
//!     assert_eq!(event.event_type(), "tick");
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! let mut payload = Payload::new();
//! payload.insert("n".into(), json!(1));
//! registry.fire("tick", payload)?;
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! # Ok(())
//! # }
//! ```

mod consumer;
mod error;
mod event;
mod handler;
mod hooks;
mod registry;

pub use consumer::Consumer;
pub use error::{HandlerError, RegistryError};
pub use event::{Event, EventType, IntoEventTypes, Lane, Payload, RESERVED_TYPE_KEY};
pub use handler::{
    CompletionCallback, Handler, HandlerResult, HandlerSet, HandlerSetBuilder, handler, observer,
};
pub use hooks::{BatchScope, NoopBatchScope, RegistryHooks, TracingHooks};
pub use registry::{
    ConsumerSubscription, DispatchHandle, Registry, RegistryBuilder, Subscription,
};
