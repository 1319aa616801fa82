//! Hashtag suggestion gateway.

use std::sync::Arc;

use crate::ports::HashtagSuggester;

/// Wraps the external suggester so that it can never fail a request.
#[derive(Clone)]
pub struct SuggestionService {
    suggester: Arc<dyn HashtagSuggester>,
}

impl SuggestionService {
    pub fn new(suggester: Arc<dyn HashtagSuggester>) -> Self {
        Self { suggester }
    }

    /// Suggested hashtags for `text`; empty for blank text or on any failure.
    pub async fn suggest(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        match self.suggester.suggest(text).await {
            Ok(hashtags) => {
                tracing::debug!(count = hashtags.len(), "Hashtag suggestions received");
                hashtags
            }
            Err(e) => {
                tracing::warn!(error = %e, "Hashtag suggestion failed");
                Vec::new()
            }
        }
    }
}
