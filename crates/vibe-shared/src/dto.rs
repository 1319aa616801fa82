//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// A post as sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub hashtags: Vec<String>,
    /// RFC 3339 creation time, millisecond precision.
    pub timestamp: String,
}

/// The whole feed, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub posts: Vec<PostResponse>,
}

/// Request for hashtag suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestHashtagsRequest {
    #[serde(default)]
    pub text: String,
}

/// Suggested hashtags, possibly empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuggestHashtagsResponse {
    pub hashtags: Vec<String>,
}
