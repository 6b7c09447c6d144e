use parking_lot::Mutex;
use patchbay_events::{
    BatchScope, Consumer, EventType, Handler, HandlerError, Lane, Payload, RegistryHooks, observer,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Shared invocation log asserted on by ordering tests.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Handler appending a fixed tag to the log on every invocation.
pub fn logging_handler(log: &Log, tag: &str) -> Handler {
    let log = log.clone();
    let tag = tag.to_owned();
    observer(move |_| log.lock().push(tag.clone()))
}

/// Handler appending `type:n` (or just the type) to the log.
pub fn recording_handler(log: &Log) -> Handler {
    let log = log.clone();
    observer(move |event| {
        let entry = match event.get("n") {
            Some(n) => format!("{}:{n}", event.event_type()),
            None => event.event_type().to_owned(),
        };
        log.lock().push(entry);
    })
}

pub fn payload_of(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object payload, got {other}"),
    }
}

/// Hooks double capturing traces and per-lane deferred failures.
#[derive(Default)]
pub struct TestHooks {
    pub traces: Mutex<Vec<String>>,
    pub async_errors: Mutex<Vec<String>>,
    pub react_errors: Mutex<Vec<String>>,
}

impl RegistryHooks for TestHooks {
    fn trace(&self, label: &str, lane: Lane, event_type: &str) {
        self.traces.lock().push(format!("[{label}] {lane} {event_type}"));
    }

    fn on_async_handler_error(&self, error: &HandlerError) {
        self.async_errors.lock().push(error.to_string());
    }

    fn on_react_handler_error(&self, error: &HandlerError) {
        self.react_errors.lock().push(error.to_string());
    }
}

/// Batch scope counting how many times a drain entered it.
#[derive(Default)]
pub struct CountingScope {
    pub runs: AtomicUsize,
}

impl BatchScope for CountingScope {
    fn run(&self, body: &mut dyn FnMut()) {
        self.runs.fetch_add(1, Ordering::SeqCst);
        body();
    }
}

/// Consumer appending `tag/lane/type` to a shared log in notification order.
pub struct RecordingConsumer {
    tag: String,
    log: Log,
}

impl RecordingConsumer {
    pub fn new(tag: &str, log: &Log) -> Arc<Self> {
        Arc::new(Self { tag: tag.to_owned(), log: log.clone() })
    }
}

impl Consumer for RecordingConsumer {
    fn handle_event(&self, lane: Lane, event_type: &EventType, _payload: &Payload) {
        self.log.lock().push(format!("{}/{lane}/{event_type}", self.tag));
    }
}

/// Lets both deferred lanes drain: covers the frame interval plus the
/// follow-up task ticks.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(60)).await;
    tokio::task::yield_now().await;
}
