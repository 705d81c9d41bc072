mod common;

use std::sync::atomic::Ordering;

use common::{FlakyTransport, ScriptedTransport, eventually, shared_config};
use tracker::{ConsumerState, Health, InMemoryBroker, ScoreTracker, Transport};

#[tokio::test]
async fn test_ready_only_after_third_attempt() {
    let broker = InMemoryBroker::new();
    let topic = broker.transport("chip-moves");
    let flaky = FlakyTransport::new(broker.transport("chip-moves"), 2);
    let attempts = flaky.attempts();

    // Nobody is subscribed yet, so the broker refuses this move
    assert!(
        topic
            .publish("Early", br#"{"player":"Early","chips":9,"source":"api"}"#)
            .await
            .is_err()
    );

    let tracker = ScoreTracker::builder()
        .config(shared_config())
        .transport(flaky)
        .build()
        .await;
    let handle = tracker.handle();
    assert!(!handle.consumer_status().is_ready());

    handle.consumer_status().wait_for(ConsumerState::Ready).await;
    assert!(handle.consumer_status().is_ready());
    assert_eq!(attempts.load(Ordering::SeqCst), 3);

    let metrics = tracker.metrics();
    assert_eq!(metrics.connect_attempts, 3);
    assert_eq!(metrics.reconnects, 2);
    assert_eq!(tracker.health(), Health::Ok);

    topic
        .publish("Late", br#"{"player":"Late","chips":4,"source":"api"}"#)
        .await
        .unwrap();

    assert!(eventually(|| handle.store().total("Late") == Some(4)).await);
    assert_eq!(handle.store().total("Early"), None);
    assert_eq!(handle.store().len(), 1);

    tracker.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lost_subscription_reconnects() {
    let scripted = ScriptedTransport::new(vec![
        br#"{"player":"Alice","chips":3,"source":"api"}"#.to_vec(),
        br#"{"player":"Bob","chips":"2"}"#.to_vec(),
    ]);
    let attempts = scripted.attempts();

    let tracker = ScoreTracker::builder()
        .config(shared_config())
        .transport(scripted)
        .build()
        .await;
    let handle = tracker.handle();

    assert!(eventually(|| attempts.load(Ordering::SeqCst) >= 2).await);
    handle.consumer_status().wait_for(ConsumerState::Ready).await;

    assert_eq!(handle.store().total("Alice"), Some(3));
    assert_eq!(handle.store().total("Bob"), Some(2));
    assert!(tracker.metrics().reconnects >= 1);

    tracker.shutdown().await.unwrap();
    assert_eq!(handle.consumer_state(), ConsumerState::Stopped);
}

#[tokio::test]
async fn test_malformed_events_do_not_stop_consumer() {
    let broker = InMemoryBroker::new();
    let topic = broker.transport("chip-moves");

    let tracker = ScoreTracker::builder()
        .config(shared_config())
        .transport(broker.transport("chip-moves"))
        .build()
        .await;
    let handle = tracker.handle();
    handle.consumer_status().wait_for(ConsumerState::Ready).await;

    topic.publish("?", b"not json at all").await.unwrap();
    topic.publish("?", br#"{"chips":6}"#).await.unwrap();
    topic
        .publish("Carol", br#"{"player":"Carol","chips":1}"#)
        .await
        .unwrap();

    assert!(eventually(|| handle.store().total("Carol") == Some(1)).await);
    assert_eq!(handle.store().total("Unknown"), Some(6));
    assert_eq!(handle.consumer_state(), ConsumerState::Ready);

    let metrics = tracker.metrics();
    assert_eq!(metrics.malformed, 2);
    assert_eq!(metrics.consumed, 2);
    assert_eq!(metrics.reconnects, 0);

    tracker.shutdown().await.unwrap();
}
