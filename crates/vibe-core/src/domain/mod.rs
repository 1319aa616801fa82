//! Domain entities - the core business objects.

mod post;
mod submission;

pub use post::{Post, PostDraft, next_timestamp, sort_newest_first};
pub use submission::{
    ImageUpload, MAX_IMAGE_BYTES, MAX_TEXT_CHARS, SubmitPost, derive_hashtags,
};
