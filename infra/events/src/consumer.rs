use crate::event::{EventType, Lane, Payload};

/// A capability notified of every fired event, regardless of lane.
///
/// Consumers observe the raw payload before the dispatch engine self-tags it
/// and before any local handler runs: at fire time on the sync lane, at
/// enqueue time on the deferred lanes. This is the seam cross-context
/// replication is built on without exposing registry internals.
pub trait Consumer: Send + Sync {
    /// Called once per fire with the lane the event was fired on.
    fn handle_event(&self, lane: Lane, event_type: &EventType, payload: &Payload);

    /// Called when the owning registry is destroyed. A consumer holding a
    /// transport must release it here; no further `handle_event` calls follow.
    fn shutdown(&self) {}
}
