//! Application state - shared across all handlers.

use std::sync::Arc;

use vibe_core::ports::{HashtagSuggester, PostRepository, RateLimiter};
use vibe_core::services::{PostService, SuggestionService};
use vibe_infra::{BroadcastFeedNotifier, DiskImageStore, InMemoryPostStore, JsonFilePostStore};

use crate::config::{AppConfig, StorageBackend};

/// Public path uploaded images are served under.
pub const UPLOADS_PATH: &str = "/uploads";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub suggestions: SuggestionService,
    pub feed: BroadcastFeedNotifier,
    pub images: Arc<DiskImageStore>,
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub fn new(config: &AppConfig) -> Self {
        let repo: Arc<dyn PostRepository> = match config.storage {
            StorageBackend::JsonFile => {
                tracing::info!(path = %config.posts_file.display(), "Using JSON file post store");
                Arc::new(JsonFilePostStore::new(&config.posts_file))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory post store - posts are lost on restart");
                Arc::new(InMemoryPostStore::new())
            }
        };

        let images = Arc::new(DiskImageStore::new(&config.upload_dir, UPLOADS_PATH));

        let state = Self::build(
            repo,
            images,
            build_suggester(config),
            build_rate_limiter(config),
        );

        tracing::info!("Application state initialized");
        state
    }

    /// Assemble the state from already constructed adapters.
    pub fn build(
        repo: Arc<dyn PostRepository>,
        images: Arc<DiskImageStore>,
        suggester: Arc<dyn HashtagSuggester>,
        rate_limiter: Option<Arc<dyn RateLimiter>>,
    ) -> Self {
        let feed = BroadcastFeedNotifier::default();
        let posts = PostService::new(repo, images.clone(), Arc::new(feed.clone()));

        Self {
            posts,
            suggestions: SuggestionService::new(suggester),
            feed,
            images,
            rate_limiter,
        }
    }
}

#[cfg(feature = "openai")]
fn build_suggester(config: &AppConfig) -> Arc<dyn HashtagSuggester> {
    use vibe_infra::{DisabledSuggester, OpenAiHashtagSuggester, OpenAiSuggesterConfig};

    let settings = &config.suggestion;
    if settings.api_key.is_none() {
        tracing::warn!("SUGGESTION_API_KEY not set. Hashtag suggestions are disabled.");
        return Arc::new(DisabledSuggester);
    }

    let suggester = OpenAiHashtagSuggester::new(OpenAiSuggesterConfig {
        base_url: settings.api_url.clone(),
        api_key: settings.api_key.clone(),
        model: settings.model.clone(),
        timeout: settings.timeout,
    });

    match suggester {
        Ok(suggester) => {
            tracing::info!(model = %settings.model, "Hashtag suggestions enabled");
            Arc::new(suggester)
        }
        Err(e) => {
            tracing::error!("Failed to set up suggestion client: {}. Suggestions disabled.", e);
            Arc::new(DisabledSuggester)
        }
    }
}

#[cfg(not(feature = "openai"))]
fn build_suggester(_config: &AppConfig) -> Arc<dyn HashtagSuggester> {
    tracing::info!("Running without openai feature - hashtag suggestions disabled");
    Arc::new(vibe_infra::DisabledSuggester)
}

#[cfg(feature = "rate-limit")]
fn build_rate_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    use vibe_infra::{InMemoryRateLimiter, RateLimitConfig};

    let limiter = InMemoryRateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window: config.rate_limit.window,
    });

    match limiter {
        Ok(limiter) => Some(Arc::new(limiter)),
        Err(e) => {
            tracing::error!("Invalid rate limit settings: {}. Rate limiting disabled.", e);
            None
        }
    }
}

#[cfg(not(feature = "rate-limit"))]
fn build_rate_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
    None
}
