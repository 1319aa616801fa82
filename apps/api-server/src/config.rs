//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Where posts are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// One JSON document on disk.
    JsonFile,
    /// Process memory; lost on restart.
    Memory,
}

/// External hashtag suggestion service settings.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "openai"), allow(dead_code))]
pub struct SuggestionConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// Suggestion endpoint rate limit, per client address.
#[derive(Debug, Clone)]
#[cfg_attr(not(feature = "rate-limit"), allow(dead_code))]
pub struct RateLimitSettings {
    pub max_requests: u32,
    pub window: Duration,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub posts_file: PathBuf,
    pub upload_dir: PathBuf,
    #[cfg_attr(not(feature = "openai"), allow(dead_code))]
    pub suggestion: SuggestionConfig,
    #[cfg_attr(not(feature = "rate-limit"), allow(dead_code))]
    pub rate_limit: RateLimitSettings,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "" | "json" => StorageBackend::JsonFile,
            other => {
                tracing::warn!(backend = %other, "Unknown STORAGE_BACKEND, using json");
                StorageBackend::JsonFile
            }
        };

        let suggestion = SuggestionConfig {
            api_url: env::var("SUGGESTION_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: env::var("SUGGESTION_API_KEY")
                .or_else(|_| env::var("OPENAI_API_KEY"))
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: env::var("SUGGESTION_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            timeout: Duration::from_secs(parse_var("SUGGESTION_TIMEOUT_SECS", 10)),
        };

        let rate_limit = RateLimitSettings {
            max_requests: parse_var("RATE_LIMIT_MAX_REQUESTS", 30),
            window: Duration::from_secs(parse_var("RATE_LIMIT_WINDOW_SECS", 60)),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            storage,
            posts_file: env::var("POSTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/posts.json")),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/uploads")),
            suggestion,
            rate_limit,
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
