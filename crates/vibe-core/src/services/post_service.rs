//! Post submission use case.

use std::sync::Arc;

use crate::domain::{Post, PostDraft, SubmitPost, derive_hashtags};
use crate::error::SubmitError;
use crate::ports::{FeedEvent, FeedNotifier, ImageStore, PostRepository, StoredImage};

/// Confirmation shown after a successful submission.
pub const POSTED_MESSAGE: &str = "Vibe posted!";

/// Outcome of a successful submission.
#[derive(Debug, Clone)]
pub struct Submitted {
    pub post: Post,
    pub message: &'static str,
}

/// Validates submissions, stores images and posts, and signals feed refreshes.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    images: Arc<dyn ImageStore>,
    feed: Arc<dyn FeedNotifier>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        images: Arc<dyn ImageStore>,
        feed: Arc<dyn FeedNotifier>,
    ) -> Self {
        Self {
            posts,
            images,
            feed,
        }
    }

    /// The feed, newest first.
    pub async fn feed(&self) -> Vec<Post> {
        self.posts.list().await
    }

    /// Run the full submission flow.
    ///
    /// Validation, upload and persistence each short-circuit. An image stored
    /// for a submission whose post cannot be persisted is removed again.
    pub async fn submit(&self, input: SubmitPost) -> Result<Submitted, SubmitError> {
        input.validate().map_err(SubmitError::Validation)?;

        let stored = match input.attached_image() {
            Some(image) => {
                let stored = self.images.save(image).await.map_err(|e| {
                    tracing::error!(error = %e, file_name = %image.file_name, "Image upload failed");
                    e
                })?;
                tracing::debug!(file = %stored.file_name, bytes = image.size(), "Image stored");
                Some(stored)
            }
            None => None,
        };

        let draft = PostDraft {
            hashtags: derive_hashtags(input.hashtags.as_deref()),
            image_url: stored.as_ref().map(|image| image.url.clone()),
            text: input.text,
        };

        let post = match self.posts.append(draft).await {
            Ok(post) => post,
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist post");
                if let Some(image) = &stored {
                    self.rollback_upload(image).await;
                }
                return Err(e.into());
            }
        };

        tracing::info!(
            post_id = %post.id,
            hashtags = post.hashtags.len(),
            has_image = post.image_url.is_some(),
            "Post created"
        );

        self.feed.publish(FeedEvent::PostCreated(post.clone())).await;

        Ok(Submitted {
            post,
            message: POSTED_MESSAGE,
        })
    }

    async fn rollback_upload(&self, image: &StoredImage) {
        match self.images.remove(image).await {
            Ok(()) => tracing::info!(file = %image.file_name, "Removed image of failed submission"),
            Err(e) => tracing::error!(
                error = %e,
                file = %image.file_name,
                "Failed to remove image of failed submission"
            ),
        }
    }
}
