use patchbay_events::{Handler, Registry, observer};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Subscribes a counting handler for `event_type`; the subscription is
/// intentionally leaked so the handler lives as long as the registry.
pub fn count_events(registry: &Registry, event_type: &'static str) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let handler: Handler = observer(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let _subscription = registry.on(event_type, handler);
    count
}

pub fn payload_of(value: serde_json::Value) -> patchbay_events::Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object payload, got {other}"),
    }
}

/// Polls `condition` until it holds or half a second passes.
pub async fn wait_until(condition: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

/// Long enough for lane drains and bridge deliveries to finish.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(80)).await;
    tokio::task::yield_now().await;
}
