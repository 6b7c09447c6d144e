use crate::ids;
use crate::medium::{self, Frame};
use crate::wire::BridgeMessage;
use parking_lot::Mutex;
use patchbay_events::{Consumer, DispatchHandle, EventType, Lane, Payload};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Relays locally fired events to peer contexts and re-injects peer events
/// into the local registry, echo-safely.
///
/// The adapter is a [`Consumer`]: the dispatch engine notifies it of every
/// fire (any lane) with the raw payload, which it serializes onto the shared
/// medium. Frames received from the medium are filtered by origin id (own
/// echo), stamped with this adapter's marker, and re-dispatched through a
/// weak [`DispatchHandle`] into the lane the peer fired on. The stamp lets
/// the adapter recognize an event it already relayed when the re-dispatch
/// loops back through `handle_event`.
pub struct BridgeAdapter {
    origin_id: String,
    channel_id: String,
    dispatch: DispatchHandle,
    sender: broadcast::Sender<Frame>,
    receive_task: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl BridgeAdapter {
    /// Joins `channel_id` (a fresh channel when `None`) and starts the
    /// receive loop.
    pub fn open(dispatch: DispatchHandle, channel_id: Option<String>) -> Arc<Self> {
        let channel_id = channel_id.unwrap_or_else(ids::fresh_channel_id);
        let (sender, receiver) = medium::join(&channel_id);

        let adapter = Arc::new(Self {
            origin_id: ids::origin_id(),
            channel_id,
            dispatch,
            sender,
            receive_task: Mutex::new(None),
            closed: AtomicBool::new(false),
        });

        let task = tokio::spawn(Self::receive_loop(Arc::downgrade(&adapter), receiver));
        *adapter.receive_task.lock() = Some(task);
        adapter
    }

    /// Identity stamped on every frame this adapter sends.
    #[must_use]
    pub fn origin_id(&self) -> &str {
        &self.origin_id
    }

    /// The shared medium channel this adapter is a peer on.
    #[must_use]
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    async fn receive_loop(adapter: Weak<Self>, mut receiver: broadcast::Receiver<Frame>) {
        loop {
            match receiver.recv().await {
                Ok(frame) => {
                    let Some(adapter) = adapter.upgrade() else { return };
                    adapter.handle_frame(&frame);
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Bridge receiver lagged; continuing from latest frame");
                },
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }

    fn handle_frame(&self, frame: &str) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }

        let message: BridgeMessage = match serde_json::from_str(frame) {
            Ok(message) => message,
            Err(error) => {
                debug!(%error, "Discarding malformed bridge frame");
                return;
            },
        };

        if !message.is_event() {
            return;
        }
        if message.origin_id == self.origin_id {
            // Own echo.
            return;
        }

        let mut payload = message.event_payload;
        payload.insert(self.origin_id.clone(), Value::Bool(true));

        if let Err(error) = self.dispatch.dispatch(message.lane, message.event_type, payload) {
            warn!(%error, "Failed to re-dispatch bridged event");
        }
    }
}

impl Consumer for BridgeAdapter {
    fn handle_event(&self, lane: Lane, event_type: &EventType, payload: &Payload) {
        if self.closed.load(Ordering::Acquire) {
            return;
        }
        if payload.contains_key(self.origin_id.as_str()) {
            // This adapter already relayed the event once; resending would
            // bounce it between peers sharing the channel.
            return;
        }

        let message = BridgeMessage::event(
            self.origin_id.clone(),
            lane,
            event_type.clone(),
            payload.clone(),
        );
        let frame = match serde_json::to_string(&message) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(%error, event = %event_type, "Bridge payload not serializable; event not relayed");
                return;
            },
        };

        if self.sender.send(frame.into()).is_err() {
            trace!(event = %event_type, "No bridge peers listening; frame dropped");
        }
    }

    fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(task) = self.receive_task.lock().take() {
            task.abort();
        }
    }
}

impl Drop for BridgeAdapter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for BridgeAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeAdapter")
            .field("origin_id", &self.origin_id)
            .field("channel_id", &self.channel_id)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
