//! In-memory post store - used for tests and throwaway deployments.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use vibe_core::domain::{Post, PostDraft, next_timestamp, sort_newest_first};
use vibe_core::error::RepoError;
use vibe_core::ports::PostRepository;

/// Post store backed by a `Vec` behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryPostStore {
    // Newest first.
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Seed the store with existing records, given newest first.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }
}

impl Default for InMemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostStore {
    async fn list(&self) -> Vec<Post> {
        let mut posts = self.posts.read().await.clone();
        sort_newest_first(&mut posts);
        posts
    }

    async fn append(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let latest = posts.iter().map(|p| p.timestamp).max();
        let post = Post::from_draft(draft, next_timestamp(Utc::now(), latest));
        posts.insert(0, post.clone());
        Ok(post)
    }
}
