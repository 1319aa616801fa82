//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod feed;
mod image_store;
mod rate_limit;
mod repository;
mod suggester;

pub use feed::{FeedEvent, FeedNotifier};
pub use image_store::{ImageStore, StoredImage};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::PostRepository;
pub use suggester::HashtagSuggester;
