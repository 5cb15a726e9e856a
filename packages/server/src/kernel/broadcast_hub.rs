//! In-process fan-out to live subscribers.
//!
//! Every connected dashboard registers an [`EventSink`]. A broadcast
//! serializes the event once, pushes it to all current sinks concurrently and
//! then drops the sinks that failed. The hub knows nothing about what is being
//! streamed.
//!
//! # Usage
//!
//! Producers:
//!   hub.broadcast(&LinkEvent::added(&link)).await;
//!
//! Consumers (websocket handler):
//!   let id = hub.connect(Arc::new(ChannelSink::new(tx))).await;
//!   ...
//!   hub.disconnect(id).await;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

use crate::common::SubscriberId;

/// One live subscriber.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, payload: &str) -> Result<()>;
}

/// Sink backed by an unbounded channel. The receiving half is drained by the
/// connection task; once it is dropped every send fails.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn send(&self, payload: &str) -> Result<()> {
        self.tx
            .send(payload.to_string())
            .map_err(|_| anyhow::anyhow!("subscriber channel closed"))
    }
}

/// Thread-safe, cloneable subscriber registry.
#[derive(Clone, Default)]
pub struct BroadcastHub {
    subscribers: Arc<RwLock<HashMap<SubscriberId, Arc<dyn EventSink>>>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn connect(&self, sink: Arc<dyn EventSink>) -> SubscriberId {
        let id = SubscriberId::new();
        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(id, sink);
        debug!(subscriber_id = %id, total = subscribers.len(), "Subscriber connected");
        id
    }

    /// Remove a subscriber. Unknown ids are ignored.
    pub async fn disconnect(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers.write().await.remove(&id).is_some();
        if removed {
            debug!(subscriber_id = %id, "Subscriber disconnected");
        }
        removed
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Send `event` to every subscriber. Returns how many received it.
    pub async fn broadcast<E: Serialize>(&self, event: &E) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "Failed to serialize broadcast event");
                return 0;
            }
        };

        // Snapshot so sends run without holding the lock.
        let snapshot: Vec<(SubscriberId, Arc<dyn EventSink>)> = self
            .subscribers
            .read()
            .await
            .iter()
            .map(|(id, sink)| (*id, Arc::clone(sink)))
            .collect();

        if snapshot.is_empty() {
            return 0;
        }

        let results = join_all(snapshot.iter().map(|(id, sink)| {
            let payload = payload.as_str();
            async move { (*id, sink.send(payload).await) }
        }))
        .await;

        let failed: Vec<SubscriberId> = results
            .iter()
            .filter_map(|(id, result)| result.as_ref().err().map(|_| *id))
            .collect();

        if !failed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in &failed {
                subscribers.remove(id);
            }
            debug!(pruned = failed.len(), "Pruned failed subscribers");
        }

        results.len() - failed.len()
    }
}
