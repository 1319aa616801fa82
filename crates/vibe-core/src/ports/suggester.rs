use async_trait::async_trait;

use crate::error::SuggestionError;

/// External hashtag suggestion service: free text in, hashtags out.
#[async_trait]
pub trait HashtagSuggester: Send + Sync {
    async fn suggest(&self, text: &str) -> Result<Vec<String>, SuggestionError>;
}
