use async_trait::async_trait;

use crate::domain::ImageUpload;
use crate::error::UploadError;

/// Handle to an image written by an [`ImageStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    /// Stored file name, unique within the store.
    pub file_name: String,
    /// Relative URL recorded on the post.
    pub url: String,
}

/// Persistence for uploaded images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Write the image and return where it can be fetched from.
    async fn save(&self, image: &ImageUpload) -> Result<StoredImage, UploadError>;

    /// Delete a previously stored image.
    async fn remove(&self, image: &StoredImage) -> Result<(), UploadError>;
}
