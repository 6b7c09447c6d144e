use crate::error::RegistryError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Key a payload may use to tag itself with its own event type.
///
/// When present, the value must equal the type being fired; a mismatch
/// aborts the dispatch with [`RegistryError::ReservedKeyConflict`].
pub const RESERVED_TYPE_KEY: &str = "type";

/// Opaque, comparable identifier naming a kind of event.
pub type EventType = Cow<'static, str>;

/// Structured event payload: a JSON object of event-specific fields.
pub type Payload = serde_json::Map<String, Value>;

/// Scheduling discipline of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lane {
    /// Handlers run on the caller's stack before the fire call returns.
    Sync,
    /// Handlers run on the next task-queue tick, batched.
    Later,
    /// Handlers run after the next frame boundary, batched.
    React,
}

impl Lane {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Later => "later",
            Self::React => "react",
        }
    }
}

impl std::fmt::Display for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks the payload's reserved self-tag against the type being fired.
///
/// # Errors
/// Returns [`RegistryError::ReservedKeyConflict`] if the payload carries a
/// `"type"` key that is not a string equal to `event_type`.
pub(crate) fn validate_payload(
    event_type: &EventType,
    payload: &Payload,
) -> Result<(), RegistryError> {
    let Some(tag) = payload.get(RESERVED_TYPE_KEY) else {
        return Ok(());
    };

    if tag.as_str() == Some(event_type.as_ref()) {
        return Ok(());
    }

    Err(RegistryError::ReservedKeyConflict {
        fired: event_type.clone(),
        tagged: tag.to_string().into(),
    })
}

/// The dispatch-time view of a fired event.
///
/// An `Event` is the payload augmented with a read-only type; the payload
/// map is self-tagged with the `"type"` key when the view is materialized,
/// after consumers have already observed the raw payload. The view lives for
/// the duration of a single dispatch.
#[derive(Debug, Clone)]
pub struct Event {
    event_type: EventType,
    payload: Payload,
}

impl Event {
    pub(crate) fn materialize(event_type: EventType, mut payload: Payload) -> Self {
        payload.insert(RESERVED_TYPE_KEY.to_owned(), Value::String(event_type.to_string()));
        Self { event_type, payload }
    }

    /// The type this event was fired as.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Narrows the event to an expected type.
    ///
    /// # Errors
    /// Returns [`RegistryError::TypeMismatch`] if the event was fired as a
    /// different type.
    pub fn as_type(&self, target: &str) -> Result<&Self, RegistryError> {
        if self.event_type == target {
            Ok(self)
        } else {
            Err(RegistryError::TypeMismatch {
                expected: target.to_owned().into(),
                actual: self.event_type.clone(),
            })
        }
    }

    /// The tagged payload backing this view.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns a payload field by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Clones out the payload key/value pairs, self-tag included.
    #[must_use]
    pub fn extract_payload(&self) -> Payload {
        self.payload.clone()
    }
}

/// Conversion into the list of event types a registration call targets.
///
/// Lets `on`/`one`/`off` accept a single type or a collection of types.
pub trait IntoEventTypes {
    fn into_event_types(self) -> Vec<EventType>;
}

impl IntoEventTypes for &'static str {
    fn into_event_types(self) -> Vec<EventType> {
        vec![Cow::Borrowed(self)]
    }
}

impl IntoEventTypes for String {
    fn into_event_types(self) -> Vec<EventType> {
        vec![Cow::Owned(self)]
    }
}

impl IntoEventTypes for EventType {
    fn into_event_types(self) -> Vec<EventType> {
        vec![self]
    }
}

impl<const N: usize> IntoEventTypes for [&'static str; N] {
    fn into_event_types(self) -> Vec<EventType> {
        self.into_iter().map(Cow::Borrowed).collect()
    }
}

impl IntoEventTypes for &[&'static str] {
    fn into_event_types(self) -> Vec<EventType> {
        self.iter().copied().map(Cow::Borrowed).collect()
    }
}

impl IntoEventTypes for Vec<String> {
    fn into_event_types(self) -> Vec<EventType> {
        self.into_iter().map(Cow::Owned).collect()
    }
}

impl IntoEventTypes for Vec<EventType> {
    fn into_event_types(self) -> Vec<EventType> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_of(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object payload, got {other}"),
        }
    }

    #[test]
    fn untagged_payload_passes_validation() {
        let payload = payload_of(json!({ "name": "Ann" }));
        assert!(validate_payload(&Cow::Borrowed("userJoined"), &payload).is_ok());
    }

    #[test]
    fn matching_self_tag_passes_validation() {
        let payload = payload_of(json!({ "type": "userJoined", "name": "Ann" }));
        assert!(validate_payload(&Cow::Borrowed("userJoined"), &payload).is_ok());
    }

    #[test]
    fn conflicting_self_tag_is_rejected() {
        let payload = payload_of(json!({ "type": "userLeft" }));
        let error = validate_payload(&Cow::Borrowed("userJoined"), &payload).unwrap_err();
        assert!(matches!(error, RegistryError::ReservedKeyConflict { .. }));
    }

    #[test]
    fn non_string_self_tag_is_rejected() {
        let payload = payload_of(json!({ "type": 7 }));
        let error = validate_payload(&Cow::Borrowed("userJoined"), &payload).unwrap_err();
        assert!(matches!(error, RegistryError::ReservedKeyConflict { .. }));
    }

    #[test]
    fn materialized_event_is_tagged() {
        let event = Event::materialize("tick".into(), payload_of(json!({ "n": 1 })));
        assert_eq!(event.event_type(), "tick");
        assert_eq!(event.get(RESERVED_TYPE_KEY), Some(&Value::String("tick".into())));
        assert_eq!(event.get("n"), Some(&json!(1)));
    }

    #[test]
    fn as_type_narrows_or_rejects() {
        let event = Event::materialize("tick".into(), Payload::new());
        assert!(event.as_type("tick").is_ok());
        assert!(matches!(event.as_type("tock"), Err(RegistryError::TypeMismatch { .. })));
    }

    #[test]
    fn extract_payload_keeps_the_tag() {
        let event = Event::materialize("tick".into(), payload_of(json!({ "n": 2 })));
        let extracted = event.extract_payload();
        assert_eq!(extracted.get("n"), Some(&json!(2)));
        assert_eq!(extracted.get(RESERVED_TYPE_KEY), Some(&json!("tick")));
    }
}
