//! In-process out topic backed by a broadcast channel.
//!
//! Uses `tokio::sync::broadcast` with a configurable buffer size. Each
//! subscriber gets an independent stream; slow receivers that fall behind
//! receive a `Lagged` error and miss events, which suits a change-event
//! feed where freshness matters more than completeness. Deployments that
//! need durable at-least-once delivery wire in their own
//! [`OutboundChannel`] instead.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use lattice_core::defaults;
use lattice_core::{OutboundChannel, OutboundEvent, Result};

/// Broadcast-based outbound channel for in-process subscribers.
pub struct BroadcastTopic {
    tx: broadcast::Sender<OutboundEvent>,
}

impl BroadcastTopic {
    /// Create a topic with the given buffer capacity.
    ///
    /// Recommended: 256 for production, 32 for tests.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to receive relayed events.
    pub fn subscribe(&self) -> broadcast::Receiver<OutboundEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for BroadcastTopic {
    fn default() -> Self {
        Self::new(defaults::TOPIC_CAPACITY)
    }
}

#[async_trait]
impl OutboundChannel for BroadcastTopic {
    async fn send(&self, event: &OutboundEvent) -> Result<()> {
        debug!(
            event_kind = event.event_kind.as_str(),
            subscriber_count = self.tx.receiver_count(),
            "Topic send"
        );
        // No subscribers means the event has nowhere to go; that is not a
        // delivery failure for a broadcast feed.
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}
