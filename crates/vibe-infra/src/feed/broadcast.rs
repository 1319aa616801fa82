//! In-process feed notifier.
//!
//! Works within a single process only: subscribers are the server's own
//! streaming connections.

use async_trait::async_trait;
use tokio::sync::broadcast;

use vibe_core::ports::{FeedEvent, FeedNotifier};

/// Feed notifier fanning events out over a tokio broadcast channel.
#[derive(Clone)]
pub struct BroadcastFeedNotifier {
    sender: broadcast::Sender<FeedEvent>,
}

impl BroadcastFeedNotifier {
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastFeedNotifier {
    fn default() -> Self {
        Self::new(100)
    }
}

#[async_trait]
impl FeedNotifier for BroadcastFeedNotifier {
    async fn publish(&self, event: FeedEvent) {
        let name = event.name();
        match self.sender.send(event) {
            Ok(receivers) => tracing::debug!(event = name, receivers, "Feed event published"),
            // No subscribers
            Err(_) => tracing::debug!(event = name, "No feed subscribers"),
        }
    }
}
