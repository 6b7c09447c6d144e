pub mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use patchbay_bridge::*;
    use patchbay_events::{Payload, Registry, observer};
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_deferred_fire_reaches_the_peer_exactly_once() {
        let origin = Registry::new();
        let descriptor = origin.generate_bridge_descriptor().unwrap();
        let peer = from_bridge_descriptor(&descriptor).unwrap();

        let origin_count = count_events(&origin, "ping");
        let peer_count = count_events(&peer, "ping");

        origin.fire_later("ping", Payload::new()).unwrap();

        assert!(
            wait_until(|| peer_count.load(Ordering::SeqCst) == 1).await,
            "the peer handler never fired"
        );
        settle().await;

        assert_eq!(peer_count.load(Ordering::SeqCst), 1, "peer must not see a duplicate");
        assert_eq!(origin_count.load(Ordering::SeqCst), 1, "origin fires locally once, no echo");
    }

    #[tokio::test]
    async fn test_sync_fire_crosses_on_the_sync_lane() {
        let origin = Registry::new();
        let descriptor = origin.generate_bridge_descriptor().unwrap();
        let peer = from_bridge_descriptor(&descriptor).unwrap();

        let origin_count = count_events(&origin, "ping");
        let peer_count = count_events(&peer, "ping");

        origin.fire("ping", Payload::new()).unwrap();

        assert!(wait_until(|| peer_count.load(Ordering::SeqCst) == 1).await);
        settle().await;
        assert_eq!(origin_count.load(Ordering::SeqCst), 1);
        assert_eq!(peer_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_payload_crosses_equivalently() {
        let origin = Registry::new();
        let descriptor = origin.generate_bridge_descriptor().unwrap();
        let peer = from_bridge_descriptor(&descriptor).unwrap();

        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let observed = seen.clone();
        let _subscription = peer.on(
            "userJoined",
            observer(move |event| {
                let name = event.get("name").and_then(|v| v.as_str()).unwrap().to_owned();
                observed.lock().push((event.event_type().to_owned(), name));
            }),
        );

        origin.fire_later("userJoined", payload_of(json!({ "name": "Ann" }))).unwrap();

        assert!(wait_until(|| !seen.lock().is_empty()).await);
        assert_eq!(*seen.lock(), vec![("userJoined".to_owned(), "Ann".to_owned())]);
    }

    #[tokio::test]
    async fn test_three_peers_each_deliver_once_without_echo() {
        let origin = Registry::new();
        let descriptor = origin.generate_bridge_descriptor().unwrap();
        let second = from_bridge_descriptor(&descriptor).unwrap();
        let third = from_bridge_descriptor(&descriptor).unwrap();

        let origin_count = count_events(&origin, "ping");
        let second_count = count_events(&second, "ping");
        let third_count = count_events(&third, "ping");

        origin.fire_later("ping", Payload::new()).unwrap();

        assert!(
            wait_until(|| {
                second_count.load(Ordering::SeqCst) == 1 && third_count.load(Ordering::SeqCst) == 1
            })
            .await
        );
        settle().await;

        assert_eq!(origin_count.load(Ordering::SeqCst), 1, "no echo back to the origin");
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
        assert_eq!(third_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_descriptor_is_stable_per_registry() {
        let registry = Registry::new();
        let first = registry.generate_bridge_descriptor().unwrap();
        let second = registry.generate_bridge_descriptor().unwrap();

        assert_eq!(first.channel_id, second.channel_id, "at most one adapter per registry");
    }

    #[tokio::test]
    async fn test_descriptor_survives_serialization() {
        let registry = Registry::new();
        let descriptor = registry.generate_bridge_descriptor().unwrap();

        let wire = serde_json::to_string(&descriptor).unwrap();
        let parsed: BridgeDescriptor = serde_json::from_str(&wire).unwrap();

        assert_eq!(parsed.channel_id, descriptor.channel_id);
        assert!(wire.contains("channelId"), "descriptor schema is camelCase: {wire}");
    }

    #[tokio::test]
    async fn test_empty_channel_id_is_rejected() {
        let descriptor = BridgeDescriptor { channel_id: "  ".into() };
        let result = from_bridge_descriptor(&descriptor);
        assert!(matches!(result, Err(BridgeError::InvalidDescriptor { .. })));
    }

    #[tokio::test]
    async fn test_destroyed_registry_leaves_the_bus() {
        let origin = Registry::new();
        let descriptor = origin.generate_bridge_descriptor().unwrap();
        let peer = from_bridge_descriptor(&descriptor).unwrap();

        let origin_count = count_events(&origin, "ping");
        let peer_count = count_events(&peer, "ping");

        peer.destroy();
        origin.fire_later("ping", Payload::new()).unwrap();
        settle().await;

        assert_eq!(origin_count.load(Ordering::SeqCst), 1);
        assert_eq!(peer_count.load(Ordering::SeqCst), 0, "a destroyed peer receives nothing");

        peer.fire("ping", Payload::new()).unwrap();
        settle().await;

        assert_eq!(
            origin_count.load(Ordering::SeqCst),
            1,
            "a destroyed peer sends nothing either"
        );
    }
}
