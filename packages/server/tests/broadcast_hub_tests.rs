//! Fan-out behaviour of the broadcast hub with mixed healthy and dead subscribers.

use std::sync::Arc;

use saver_core::domains::links::models::{Link, LinkEvent, LinkSource};
use saver_core::kernel::{BroadcastHub, ChannelSink, EventSink, FailingSink, RecordingSink};
use tokio::sync::mpsc;

fn sample_event() -> LinkEvent {
    let link = Link::placeholder("https://example.com/a", LinkSource::Web, None);
    LinkEvent::added(&link)
}

#[tokio::test]
async fn failed_subscriber_is_pruned_after_broadcast() {
    let hub = BroadcastHub::new();
    let first = Arc::new(RecordingSink::new());
    let second = Arc::new(RecordingSink::new());

    hub.connect(first.clone()).await;
    hub.connect(second.clone()).await;
    hub.connect(Arc::new(FailingSink)).await;
    assert_eq!(hub.subscriber_count().await, 3);

    let delivered = hub.broadcast(&sample_event()).await;
    assert_eq!(delivered, 2);
    assert_eq!(hub.subscriber_count().await, 2);

    let delivered = hub.broadcast(&sample_event()).await;
    assert_eq!(delivered, 2);
    assert_eq!(first.received().len(), 2);
    assert_eq!(second.received().len(), 2);
}

#[tokio::test]
async fn closed_channel_counts_as_failed_delivery() {
    let hub = BroadcastHub::new();
    let (tx, rx) = mpsc::unbounded_channel();
    hub.connect(Arc::new(ChannelSink::new(tx))).await;

    // Connection task gone.
    drop(rx);

    assert_eq!(hub.broadcast(&sample_event()).await, 0);
    assert_eq!(hub.subscriber_count().await, 0);
}

#[tokio::test]
async fn channel_sink_delivers_serialized_event() {
    let hub = BroadcastHub::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = hub.connect(Arc::new(ChannelSink::new(tx))).await;

    hub.broadcast(&sample_event()).await;

    let payload = rx.recv().await.expect("event delivered");
    let event: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(event["type"], "link_added");
    assert_eq!(event["data"]["raw_url"], "https://example.com/a");

    assert!(hub.disconnect(id).await);
    assert!(!hub.disconnect(id).await);
}

#[tokio::test]
async fn concurrent_connects_and_broadcasts() {
    let hub = BroadcastHub::new();
    let sinks: Vec<Arc<RecordingSink>> = (0..20).map(|_| Arc::new(RecordingSink::new())).collect();

    let connects = sinks.iter().map(|sink| {
        let hub = hub.clone();
        let sink: Arc<dyn EventSink> = sink.clone();
        tokio::spawn(async move { hub.connect(sink).await })
    });
    for handle in futures::future::join_all(connects).await {
        handle.unwrap();
    }

    let broadcasts = (0..5).map(|_| {
        let hub = hub.clone();
        tokio::spawn(async move { hub.broadcast(&sample_event()).await })
    });
    for delivered in futures::future::join_all(broadcasts).await {
        assert_eq!(delivered.unwrap(), 20);
    }

    assert!(sinks.iter().all(|s| s.received().len() == 5));
}
