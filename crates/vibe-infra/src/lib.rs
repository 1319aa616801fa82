//! # Vibe Infrastructure
//!
//! Concrete implementations of the ports defined in `vibe-core`.
//! This crate contains post storage, image uploads, the feed broadcaster and
//! external service integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, local storage only
//! - `openai` - Hashtag suggestions from an OpenAI-compatible API via reqwest
//! - `rate-limit` - Rate limiting via governor

pub mod feed;
pub mod storage;
pub mod suggest;
pub mod uploads;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports
pub use feed::BroadcastFeedNotifier;
pub use storage::{InMemoryPostStore, JsonFilePostStore};
pub use suggest::DisabledSuggester;
pub use uploads::DiskImageStore;

#[cfg(feature = "openai")]
pub use suggest::{OpenAiHashtagSuggester, OpenAiSuggesterConfig};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
