//! Feed refresh port - tells presentation layers the feed changed.

use async_trait::async_trait;

use crate::domain::Post;

/// Something happened to the feed.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    PostCreated(Post),
}

impl FeedEvent {
    /// Event name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            FeedEvent::PostCreated(_) => "post_created",
        }
    }

    pub fn post(&self) -> &Post {
        match self {
            FeedEvent::PostCreated(post) => post,
        }
    }
}

/// Publisher of feed events. Delivery is best effort.
#[async_trait]
pub trait FeedNotifier: Send + Sync {
    async fn publish(&self, event: FeedEvent);
}
