use patchbay_events::{EventType, Lane, Payload};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const MESSAGE_KIND_EVENT: &str = "event";

/// Envelope relayed over the shared broadcast medium, one JSON text frame
/// per message.
///
/// Peers are untrusted: unknown fields and unknown kinds are tolerated and
/// skipped by the receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeMessage {
    pub kind: Cow<'static, str>,
    pub origin_id: String,
    pub lane: Lane,
    pub event_type: EventType,
    pub event_payload: Payload,
}

impl BridgeMessage {
    pub(crate) fn event(
        origin_id: String,
        lane: Lane,
        event_type: EventType,
        event_payload: Payload,
    ) -> Self {
        Self {
            kind: Cow::Borrowed(MESSAGE_KIND_EVENT),
            origin_id,
            lane,
            event_type,
            event_payload,
        }
    }

    pub(crate) fn is_event(&self) -> bool {
        self.kind == MESSAGE_KIND_EVENT
    }
}
