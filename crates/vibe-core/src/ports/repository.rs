use async_trait::async_trait;

use crate::domain::{Post, PostDraft};
use crate::error::RepoError;

/// Post storage - the whole feed behind one abstraction.
///
/// Implementations assign ids and server-side timestamps; callers never do.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// All posts, newest first.
    ///
    /// A missing or unreadable backing store yields an empty feed.
    async fn list(&self) -> Vec<Post>;

    /// Store a draft as the newest post and return the finalized record.
    ///
    /// On error the stored collection is left unchanged.
    async fn append(&self, draft: PostDraft) -> Result<Post, RepoError>;
}
