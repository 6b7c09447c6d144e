use crate::consumer::Consumer;
use crate::error::{HandlerError, RegistryError};
use crate::event::{Event, EventType, IntoEventTypes, Lane, Payload, validate_payload};
use crate::handler::{CompletionCallback, Handler, HandlerSet};
use crate::hooks::{BatchScope, NoopBatchScope, RegistryHooks, TracingHooks};
use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{trace, warn};

/// Tokio rendition of a paint-frame boundary (one 60 Hz frame).
const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Persistent,
    OneShot,
    Generic,
}

#[derive(Default)]
struct HandlerTable {
    persistent: FxHashMap<EventType, Vec<Handler>>,
    one_shot: FxHashMap<EventType, Vec<Handler>>,
    generic: Vec<Handler>,
}

impl HandlerTable {
    fn register(&mut self, slot: Slot, event_type: EventType, handler: Handler) {
        match slot {
            Slot::Persistent => self.persistent.entry(event_type).or_default().push(handler),
            Slot::OneShot => self.one_shot.entry(event_type).or_default().push(handler),
            Slot::Generic => self.generic.push(handler),
        }
    }

    /// Removes the first occurrence of `handler` from `list` by identity.
    fn remove_first(list: &mut Vec<Handler>, handler: &Handler) -> bool {
        list.iter().position(|registered| Arc::ptr_eq(registered, handler)).is_some_and(|index| {
            list.remove(index);
            true
        })
    }

    fn remove(&mut self, slot: Slot, event_type: &str, handler: &Handler) -> bool {
        let map = match slot {
            Slot::Persistent => &mut self.persistent,
            Slot::OneShot => &mut self.one_shot,
            Slot::Generic => return Self::remove_first(&mut self.generic, handler),
        };
        map.get_mut(event_type).is_some_and(|list| Self::remove_first(list, handler))
    }

    /// Removes one occurrence of `handler` from every list it appears in.
    fn remove_everywhere(&mut self, handler: &Handler) {
        for list in self.persistent.values_mut() {
            Self::remove_first(list, handler);
        }
        for list in self.one_shot.values_mut() {
            Self::remove_first(list, handler);
        }
        Self::remove_first(&mut self.generic, handler);
    }

    /// Drains the one-shot list for `event_type`; those handlers are gone
    /// from the table before any of them runs.
    fn take_one_shot(&mut self, event_type: &str) -> Vec<Handler> {
        self.one_shot.remove(event_type).unwrap_or_default()
    }

    fn persistent_snapshot(&self, event_type: &str) -> Vec<Handler> {
        self.persistent.get(event_type).cloned().unwrap_or_default()
    }

    fn generic_snapshot(&self) -> Vec<Handler> {
        self.generic.clone()
    }

    fn clear(&mut self) {
        self.persistent.clear();
        self.one_shot.clear();
        self.generic.clear();
    }
}

struct PendingItem {
    event_type: EventType,
    payload: Payload,
    on_complete: Option<CompletionCallback>,
}

/// `IDLE` is `armed: false` with an empty queue; `SCHEDULED` is `armed: true`.
/// The drain flips back to `armed: false` before invoking anything, so calls
/// made while draining arm a fresh cycle instead of joining the batch in
/// flight.
#[derive(Default)]
struct LaneState {
    armed: bool,
    queue: Vec<PendingItem>,
}

struct RelaySlot {
    consumer: Arc<dyn Consumer>,
    channel: String,
}

struct RegistryInner {
    table: Mutex<HandlerTable>,
    consumers: Mutex<Vec<Arc<dyn Consumer>>>,
    registered_sets: Mutex<FxHashMap<usize, Vec<(EventType, Handler)>>>,
    later: Mutex<LaneState>,
    react: Mutex<LaneState>,
    relay: Mutex<Option<RelaySlot>>,
    hooks: Arc<dyn RegistryHooks>,
    batch: Arc<dyn BatchScope>,
    frame_interval: Duration,
    debug_label: Mutex<Option<String>>,
    warn_unhandled: AtomicBool,
}

impl RegistryInner {
    fn lane(&self, lane: Lane) -> &Mutex<LaneState> {
        match lane {
            Lane::Later => &self.later,
            Lane::React => &self.react,
            Lane::Sync => unreachable!("the sync lane has no queue"),
        }
    }

    fn fire(&self, event_type: EventType, payload: Payload) -> Result<(), RegistryError> {
        validate_payload(&event_type, &payload)?;
        self.notify_consumers(Lane::Sync, &event_type, &payload);
        let event = Event::materialize(event_type, payload);
        self.invoke_event(Lane::Sync, &event)
    }

    fn enqueue_deferred(
        self: &Arc<Self>,
        lane: Lane,
        event_type: EventType,
        payload: Payload,
        on_complete: Option<CompletionCallback>,
    ) -> Result<(), RegistryError> {
        validate_payload(&event_type, &payload)?;

        let arm = {
            let mut state = self.lane(lane).lock();
            state.queue.push(PendingItem {
                event_type: event_type.clone(),
                payload: payload.clone(),
                on_complete,
            });
            !std::mem::replace(&mut state.armed, true)
        };
        if arm {
            self.arm_drain(lane);
        }

        self.notify_consumers(lane, &event_type, &payload);
        Ok(())
    }

    fn arm_drain(self: &Arc<Self>, lane: Lane) {
        let inner = Arc::downgrade(self);
        let frame_interval = self.frame_interval;
        tokio::spawn(async move {
            if lane == Lane::React {
                tokio::time::sleep(frame_interval).await;
            }
            tokio::task::yield_now().await;
            let Some(inner) = inner.upgrade() else { return };
            inner.drain(lane);
        });
    }

    fn drain(&self, lane: Lane) {
        let items = {
            let mut state = self.lane(lane).lock();
            state.armed = false;
            std::mem::take(&mut state.queue)
        };
        if items.is_empty() {
            return;
        }

        match lane {
            Lane::Later => {
                for item in items {
                    self.run_deferred(lane, item);
                }
            },
            Lane::React => {
                let mut pending = items.into_iter();
                self.batch.run(&mut || {
                    for item in pending.by_ref() {
                        self.run_deferred(Lane::React, item);
                    }
                });
            },
            Lane::Sync => unreachable!("the sync lane is never drained"),
        }
    }

    /// One deferred item is one failure domain: a failing handler chain or
    /// completion callback is reported to the hooks and the rest of the
    /// batch still runs.
    fn run_deferred(&self, lane: Lane, item: PendingItem) {
        let PendingItem { event_type, payload, on_complete } = item;

        let event = Event::materialize(event_type, payload);
        if let Err(error) = self.invoke_event(lane, &event) {
            self.report_deferred(lane, flatten_failure(error));
        }

        if let Some(callback) = on_complete
            && let Err(error) = callback()
        {
            self.report_deferred(lane, error);
        }
    }

    fn report_deferred(&self, lane: Lane, error: HandlerError) {
        match lane {
            Lane::Later => self.hooks.on_async_handler_error(&error),
            Lane::React => self.hooks.on_react_handler_error(&error),
            Lane::Sync => unreachable!("sync failures propagate to the caller"),
        }
    }

    fn invoke_event(&self, lane: Lane, event: &Event) -> Result<(), RegistryError> {
        let label = self.debug_label.lock().clone();
        if let Some(label) = label {
            self.hooks.trace(&label, lane, event.event_type());
        }

        let (one_shot, persistent, generic) = {
            let mut table = self.table.lock();
            (
                table.take_one_shot(event.event_type()),
                table.persistent_snapshot(event.event_type()),
                table.generic_snapshot(),
            )
        };

        let mut invoked = 0_usize;
        for handler in one_shot.iter().chain(&persistent).chain(&generic) {
            (handler.as_ref())(event).map_err(|source| RegistryError::Handler {
                event_type: event.event_type().to_owned().into(),
                source,
            })?;
            invoked += 1;
        }

        if invoked == 0 && self.warn_unhandled.load(Ordering::Relaxed) {
            warn!(event = event.event_type(), lane = %lane, "Event fired with no registered handlers");
        }
        Ok(())
    }

    fn notify_consumers(&self, lane: Lane, event_type: &EventType, payload: &Payload) {
        let consumers = self.consumers.lock().clone();
        for consumer in consumers {
            consumer.handle_event(lane, event_type, payload);
        }
    }
}

fn flatten_failure(error: RegistryError) -> HandlerError {
    match error {
        RegistryError::Handler { source, .. } => source,
        other => Box::new(other),
    }
}

/// Builder for a [`Registry`] with non-default hooks, batch scope, or frame
/// interval.
pub struct RegistryBuilder {
    hooks: Arc<dyn RegistryHooks>,
    batch: Arc<dyn BatchScope>,
    frame_interval: Duration,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self {
            hooks: Arc::new(TracingHooks),
            batch: Arc::new(NoopBatchScope),
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl RegistryBuilder {
    /// Replaces the diagnostics sink.
    #[must_use = "The builder must be finished with `build` to produce a registry"]
    pub fn hooks(mut self, hooks: Arc<dyn RegistryHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replaces the batched-update scope wrapped around frame-lane drains.
    #[must_use = "The builder must be finished with `build` to produce a registry"]
    pub fn batch_scope(mut self, scope: Arc<dyn BatchScope>) -> Self {
        self.batch = scope;
        self
    }

    /// Overrides the frame boundary used by the frame-aligned lane.
    #[must_use = "The builder must be finished with `build` to produce a registry"]
    pub const fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval;
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        Registry {
            inner: Arc::new(RegistryInner {
                table: Mutex::new(HandlerTable::default()),
                consumers: Mutex::new(Vec::new()),
                registered_sets: Mutex::new(FxHashMap::default()),
                later: Mutex::new(LaneState::default()),
                react: Mutex::new(LaneState::default()),
                relay: Mutex::new(None),
                hooks: self.hooks,
                batch: self.batch,
                frame_interval: self.frame_interval,
                debug_label: Mutex::new(None),
                warn_unhandled: AtomicBool::new(false),
            }),
        }
    }
}

impl std::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder").field("frame_interval", &self.frame_interval).finish()
    }
}

/// The dispatch engine: handler bookkeeping plus a synchronous lane and two
/// deferred lanes.
///
/// Cloning a `Registry` clones a handle to the same engine. Deferred-lane
/// drains are armed as Tokio tasks, so `fire_later`/`fire_react` must be
/// called within a Tokio runtime.
///
/// # Example
///
/// ```rust
/// use patchbay_events::{Payload, Registry, observer};
/// use serde_json::json;
///
/// let registry = Registry::new();
/// let subscription = registry.on("userJoined", observer(|event| {
///     assert_eq!(event.get("name"), Some(&json!("Ann")));
/// }));
///
/// let mut payload = Payload::new();
/// payload.insert("name".into(), json!("Ann"));
/// registry.fire("userJoined", payload).unwrap();
/// subscription.unsubscribe();
/// ```
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry with default hooks, a pass-through batch scope,
    /// and a 16 ms frame interval.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[must_use = "The builder must be configured before it can be used to build a registry"]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Fires an event synchronously on the caller's stack.
    ///
    /// Consumers are notified first (with the raw payload), then handlers
    /// run in order one-shot, persistent, generic before this call returns.
    ///
    /// # Errors
    /// Returns [`RegistryError::ReservedKeyConflict`] if the payload is
    /// self-tagged with a different type; nothing is dispatched in that
    /// case. Returns [`RegistryError::Handler`] if a handler fails — the
    /// remaining handler chain for this event is interrupted, so one
    /// misbehaving handler starves the handlers registered after it.
    pub fn fire(
        &self,
        event_type: impl Into<EventType>,
        payload: Payload,
    ) -> Result<(), RegistryError> {
        self.inner.fire(event_type.into(), payload)
    }

    /// Enqueues an event for the next task-queue tick.
    ///
    /// Consumers are notified immediately; handlers run when the lane
    /// drains. Calls made before the drain are batched into one drain,
    /// invoked in call order.
    ///
    /// # Errors
    /// Returns [`RegistryError::ReservedKeyConflict`] if the payload is
    /// self-tagged with a different type. Handler failures do not surface
    /// here; they are reported per item through the registry hooks.
    pub fn fire_later(
        &self,
        event_type: impl Into<EventType>,
        payload: Payload,
    ) -> Result<(), RegistryError> {
        self.inner.enqueue_deferred(Lane::Later, event_type.into(), payload, None)
    }

    /// [`fire_later`](Self::fire_later) with a completion callback invoked
    /// right after the item's handlers run.
    ///
    /// # Errors
    /// Same as [`fire_later`](Self::fire_later).
    pub fn fire_later_with(
        &self,
        event_type: impl Into<EventType>,
        payload: Payload,
        on_complete: CompletionCallback,
    ) -> Result<(), RegistryError> {
        self.inner.enqueue_deferred(Lane::Later, event_type.into(), payload, Some(on_complete))
    }

    /// Enqueues an event for the next frame boundary.
    ///
    /// The drain is deferred one further task tick past the frame boundary
    /// and the whole batch runs inside a single batched-update scope.
    ///
    /// # Errors
    /// Same as [`fire_later`](Self::fire_later).
    pub fn fire_react(
        &self,
        event_type: impl Into<EventType>,
        payload: Payload,
    ) -> Result<(), RegistryError> {
        self.inner.enqueue_deferred(Lane::React, event_type.into(), payload, None)
    }

    /// [`fire_react`](Self::fire_react) with a completion callback invoked
    /// right after the item's handlers run.
    ///
    /// # Errors
    /// Same as [`fire_later`](Self::fire_later).
    pub fn fire_react_with(
        &self,
        event_type: impl Into<EventType>,
        payload: Payload,
        on_complete: CompletionCallback,
    ) -> Result<(), RegistryError> {
        self.inner.enqueue_deferred(Lane::React, event_type.into(), payload, Some(on_complete))
    }

    /// Registers a persistent handler for one or more event types.
    pub fn on(&self, types: impl IntoEventTypes, handler: Handler) -> Subscription {
        self.subscribe(Slot::Persistent, types.into_event_types(), handler)
    }

    /// Registers a one-shot handler for one or more event types: invoked at
    /// most once per registration, and removed from the table before any
    /// handler of the triggering dispatch runs.
    pub fn one(&self, types: impl IntoEventTypes, handler: Handler) -> Subscription {
        self.subscribe(Slot::OneShot, types.into_event_types(), handler)
    }

    /// Removes one persistent and one one-shot registration of `handler`
    /// for each given type. Dispatches already snapshotted are unaffected.
    pub fn off(&self, types: impl IntoEventTypes, handler: &Handler) {
        let mut table = self.inner.table.lock();
        for event_type in types.into_event_types() {
            table.remove(Slot::Persistent, &event_type, handler);
            table.remove(Slot::OneShot, &event_type, handler);
        }
    }

    /// Registers a generic handler invoked for every fired event, after the
    /// type-matched handlers.
    pub fn on_all(&self, handler: Handler) -> Subscription {
        self.subscribe(Slot::Generic, Vec::new(), handler)
    }

    /// Removes one occurrence of `handler` from every handler list it
    /// appears in: all per-type lists and the generic list.
    pub fn off_all(&self, handler: &Handler) {
        self.inner.table.lock().remove_everywhere(handler);
    }

    fn subscribe(&self, slot: Slot, types: Vec<EventType>, handler: Handler) -> Subscription {
        {
            let mut table = self.inner.table.lock();
            if slot == Slot::Generic {
                table.generic.push(handler.clone());
            } else {
                for event_type in &types {
                    table.register(slot, event_type.clone(), handler.clone());
                }
            }
        }
        Subscription { inner: Arc::downgrade(&self.inner), slot, types, handler }
    }

    /// Subscribes every entry of a prebuilt [`HandlerSet`] as a persistent
    /// handler and records the set so [`unregister_handler`] can remove
    /// exactly those subscriptions.
    ///
    /// # Errors
    /// Returns [`RegistryError::AlreadyRegistered`] if this set is already
    /// registered here.
    ///
    /// [`unregister_handler`]: Self::unregister_handler
    pub fn register_handler(&self, set: &HandlerSet) -> Result<(), RegistryError> {
        let mut sets = self.inner.registered_sets.lock();
        if sets.contains_key(&set.key()) {
            return Err(RegistryError::AlreadyRegistered);
        }

        let mut recorded = Vec::with_capacity(set.len());
        {
            let mut table = self.inner.table.lock();
            for (event_type, handler) in set.entries() {
                table.register(Slot::Persistent, event_type.clone(), handler.clone());
                recorded.push((event_type.clone(), handler.clone()));
            }
        }
        sets.insert(set.key(), recorded);
        Ok(())
    }

    /// Removes every subscription made by [`register_handler`] for this set.
    ///
    /// # Errors
    /// Returns [`RegistryError::NotRegistered`] if the set was never
    /// registered here (or was already unregistered).
    ///
    /// [`register_handler`]: Self::register_handler
    pub fn unregister_handler(&self, set: &HandlerSet) -> Result<(), RegistryError> {
        let recorded = self
            .inner
            .registered_sets
            .lock()
            .remove(&set.key())
            .ok_or(RegistryError::NotRegistered)?;

        let mut table = self.inner.table.lock();
        for (event_type, handler) in &recorded {
            table.remove(Slot::Persistent, event_type, handler);
        }
        Ok(())
    }

    /// Registers a consumer notified of every fire on every lane, in
    /// consumer-registration order, before local handlers run.
    pub fn register_consumer(&self, consumer: Arc<dyn Consumer>) -> ConsumerSubscription {
        self.inner.consumers.lock().push(consumer.clone());
        ConsumerSubscription { inner: Arc::downgrade(&self.inner), consumer }
    }

    /// Removes one registration of `consumer`.
    pub fn unregister_consumer(&self, consumer: &Arc<dyn Consumer>) {
        let mut consumers = self.inner.consumers.lock();
        if let Some(index) = consumers.iter().position(|c| Arc::ptr_eq(c, consumer)) {
            consumers.remove(index);
        }
    }

    /// A narrow, weak capability to dispatch into this registry's lanes.
    ///
    /// This is the seam a replication relay re-injects peer events through;
    /// it keeps the relay from owning the registry.
    #[must_use]
    pub fn dispatch_handle(&self) -> DispatchHandle {
        DispatchHandle { inner: Arc::downgrade(&self.inner) }
    }

    /// Attaches a replication relay: the consumer is registered and
    /// remembered so [`destroy`](Self::destroy) can shut its transport down.
    /// At most one relay per registry.
    ///
    /// # Errors
    /// Returns [`RegistryError::RelayAlreadyAttached`] if a relay is
    /// already attached.
    pub fn attach_relay(
        &self,
        consumer: Arc<dyn Consumer>,
        channel: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let mut relay = self.inner.relay.lock();
        if relay.is_some() {
            return Err(RegistryError::RelayAlreadyAttached);
        }
        self.inner.consumers.lock().push(consumer.clone());
        *relay = Some(RelaySlot { consumer, channel: channel.into() });
        Ok(())
    }

    /// The medium channel of the attached relay, if any.
    #[must_use]
    pub fn relay_channel(&self) -> Option<String> {
        self.inner.relay.lock().as_ref().map(|slot| slot.channel.clone())
    }

    /// Routes every dispatch through [`RegistryHooks::trace`] under `label`.
    pub fn enable_debug(&self, label: impl Into<String>) {
        *self.inner.debug_label.lock() = Some(label.into());
    }

    pub fn disable_debug(&self) {
        *self.inner.debug_label.lock() = None;
    }

    /// Logs a warning whenever a fire invokes zero handlers.
    pub fn enable_warn_unhandled(&self) {
        self.inner.warn_unhandled.store(true, Ordering::Relaxed);
    }

    pub fn disable_warn_unhandled(&self) {
        self.inner.warn_unhandled.store(false, Ordering::Relaxed);
    }

    /// Clears all handler lists, consumers, bulk registrations, and pending
    /// deferred items, and tears down the attached relay (transport closed,
    /// nothing further is sent or delivered).
    pub fn destroy(&self) {
        self.inner.table.lock().clear();
        self.inner.consumers.lock().clear();
        self.inner.registered_sets.lock().clear();
        self.inner.later.lock().queue.clear();
        self.inner.react.lock().queue.clear();

        let relay = self.inner.relay.lock().take();
        if let Some(slot) = relay {
            slot.consumer.shutdown();
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.inner.table.lock();
        f.debug_struct("Registry")
            .field("persistent_types", &table.persistent.len())
            .field("one_shot_types", &table.one_shot.len())
            .field("generic_handlers", &table.generic.len())
            .field("consumers", &self.inner.consumers.lock().len())
            .finish_non_exhaustive()
    }
}

/// Undo capability returned by `on`/`one`/`on_all`.
///
/// Dropping a subscription does not unsubscribe; call
/// [`unsubscribe`](Self::unsubscribe). Unsubscribing never affects a
/// dispatch already in flight.
#[must_use = "a subscription is removed only by calling `unsubscribe`"]
pub struct Subscription {
    inner: Weak<RegistryInner>,
    slot: Slot,
    types: Vec<EventType>,
    handler: Handler,
}

impl Subscription {
    pub fn unsubscribe(self) {
        let Some(inner) = self.inner.upgrade() else { return };
        let mut table = inner.table.lock();
        match self.slot {
            Slot::Generic => {
                HandlerTable::remove_first(&mut table.generic, &self.handler);
            },
            slot => {
                for event_type in &self.types {
                    table.remove(slot, event_type, &self.handler);
                }
            },
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("slot", &self.slot)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}

/// Undo capability returned by [`Registry::register_consumer`].
#[must_use = "a consumer registration is removed only by calling `unsubscribe`"]
pub struct ConsumerSubscription {
    inner: Weak<RegistryInner>,
    consumer: Arc<dyn Consumer>,
}

impl ConsumerSubscription {
    pub fn unsubscribe(self) {
        let Some(inner) = self.inner.upgrade() else { return };
        let mut consumers = inner.consumers.lock();
        if let Some(index) = consumers.iter().position(|c| Arc::ptr_eq(c, &self.consumer)) {
            consumers.remove(index);
        }
    }
}

impl std::fmt::Debug for ConsumerSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsumerSubscription").finish_non_exhaustive()
    }
}

/// Weak, lane-addressed dispatch capability into one registry.
///
/// Dispatching through a handle whose registry is gone is a traced no-op.
#[derive(Debug, Clone)]
pub struct DispatchHandle {
    inner: Weak<RegistryInner>,
}

impl DispatchHandle {
    /// Dispatches into the lane the event was originally fired on.
    ///
    /// # Errors
    /// Same error surface as the matching `fire` family method.
    pub fn dispatch(
        &self,
        lane: Lane,
        event_type: impl Into<EventType>,
        payload: Payload,
    ) -> Result<(), RegistryError> {
        let Some(inner) = self.inner.upgrade() else {
            trace!(lane = %lane, "Dispatch dropped: registry is gone");
            return Ok(());
        };
        match lane {
            Lane::Sync => inner.fire(event_type.into(), payload),
            lane => inner.enqueue_deferred(lane, event_type.into(), payload, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::observer;
    use std::sync::atomic::AtomicUsize;

    fn counting_handler(counter: &Arc<AtomicUsize>) -> Handler {
        let counter = counter.clone();
        observer(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn duplicate_registration_is_two_invocations() {
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let handler = counting_handler(&counter);

        let first = registry.on("tick", handler.clone());
        let second = registry.on("tick", handler);
        registry.fire("tick", Payload::new()).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        first.unsubscribe();
        second.unsubscribe();
    }

    #[test]
    fn unsubscribe_removes_a_single_occurrence() {
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let handler = counting_handler(&counter);

        let _first = registry.on("tick", handler.clone());
        let second = registry.on("tick", handler);
        second.unsubscribe();
        registry.fire("tick", Payload::new()).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn off_removes_from_both_per_type_tables() {
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let handler = counting_handler(&counter);

        let _persistent = registry.on("tick", handler.clone());
        let _one_shot = registry.one("tick", handler.clone());
        registry.off("tick", &handler);
        registry.fire("tick", Payload::new()).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn destroy_clears_every_list() {
        let registry = Registry::new();
        let counter = Arc::new(AtomicUsize::new(0));
        let _on = registry.on("tick", counting_handler(&counter));
        let _all = registry.on_all(counting_handler(&counter));

        registry.destroy();
        registry.fire("tick", Payload::new()).unwrap();

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
