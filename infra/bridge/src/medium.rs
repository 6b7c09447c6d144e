use fxhash::FxHashMap;
use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};
use tokio::sync::broadcast;

/// A safe default for channel buffers, matching a busy UI's burst size.
const CHANNEL_CAPACITY: usize = 128;

/// One serialized [`BridgeMessage`](crate::BridgeMessage).
pub(crate) type Frame = Arc<str>;

/// Named broadcast channels shared by every adapter in the process: the
/// Rust rendition of the platform's ambient named-channel broadcast bus.
/// Adapters carry no global state themselves; two adapters joined to the
/// same channel id are peers on the same logical bus.
static CHANNELS: LazyLock<Mutex<FxHashMap<String, broadcast::Sender<Frame>>>> =
    LazyLock::new(|| Mutex::new(FxHashMap::default()));

/// Joins a named channel, creating it on first use.
pub(crate) fn join(channel_id: &str) -> (broadcast::Sender<Frame>, broadcast::Receiver<Frame>) {
    let sender = {
        let mut channels = CHANNELS.lock();
        channels
            .entry(channel_id.to_owned())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    };
    let receiver = sender.subscribe();
    (sender, receiver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn peers_on_one_channel_share_frames() {
        let (sender, _keepalive) = join("medium-test-shared");
        let (_, mut receiver) = join("medium-test-shared");

        sender.send("frame".into()).unwrap();
        assert_eq!(&*receiver.recv().await.unwrap(), "frame");
    }

    #[tokio::test]
    async fn channels_are_isolated_by_id() {
        let (sender, _keepalive) = join("medium-test-a");
        let (_, mut other) = join("medium-test-b");

        sender.send("frame".into()).unwrap();
        assert!(
            tokio::time::timeout(std::time::Duration::from_millis(50), other.recv())
                .await
                .is_err(),
            "frame must not cross channels"
        );
    }
}
