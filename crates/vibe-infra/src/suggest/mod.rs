//! Hashtag suggestion backends.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiHashtagSuggester, OpenAiSuggesterConfig};

use async_trait::async_trait;

use vibe_core::error::SuggestionError;
use vibe_core::ports::HashtagSuggester;

/// Suggester used when no backend is configured. Always fails, which the
/// suggestion gateway turns into an empty list.
pub struct DisabledSuggester;

#[async_trait]
impl HashtagSuggester for DisabledSuggester {
    async fn suggest(&self, _text: &str) -> Result<Vec<String>, SuggestionError> {
        Err(SuggestionError::NotConfigured)
    }
}
