//! Hashtag suggestions from an OpenAI-compatible chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use vibe_core::error::SuggestionError;
use vibe_core::ports::HashtagSuggester;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const MAX_SUGGESTIONS: usize = 5;

const SYSTEM_PROMPT: &str = "You suggest hashtags for short mood posts on a social feed. \
Reply with a JSON object of the form {\"hashtags\": [\"#example\"]} containing \
between 3 and 5 relevant, concise hashtags. Reply with JSON only.";

/// Connection settings for the suggestion API.
#[derive(Debug, Clone)]
pub struct OpenAiSuggesterConfig {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAiSuggesterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Suggester calling `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiHashtagSuggester {
    client: Client,
    config: OpenAiSuggesterConfig,
}

impl OpenAiHashtagSuggester {
    pub fn new(config: OpenAiSuggesterConfig) -> Result<Self, SuggestionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SuggestionError::Request(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &ChatCompletionRequest<'_>,
    ) -> Result<String, SuggestionError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| SuggestionError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SuggestionError::Request(format!("HTTP {status}: {body_text}")));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SuggestionError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| SuggestionError::InvalidResponse("no content in response".into()))
    }
}

#[async_trait]
impl HashtagSuggester for OpenAiHashtagSuggester {
    async fn suggest(&self, text: &str) -> Result<Vec<String>, SuggestionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SuggestionError::NotConfigured)?;

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let content = self.send_request(api_key, &request).await?;
        parse_hashtags(&content)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SuggestionPayload {
    Object { hashtags: Vec<String> },
    List(Vec<String>),
}

/// Extract hashtags from the model's reply.
///
/// Accepts `{"hashtags": [...]}` or a bare array, optionally inside a
/// markdown code fence.
fn parse_hashtags(content: &str) -> Result<Vec<String>, SuggestionError> {
    let json = strip_code_fence(content);
    let payload: SuggestionPayload = serde_json::from_str(json)
        .map_err(|e| SuggestionError::InvalidResponse(format!("{e}: {content}")))?;

    let raw = match payload {
        SuggestionPayload::Object { hashtags } => hashtags,
        SuggestionPayload::List(hashtags) => hashtags,
    };

    let mut hashtags: Vec<String> = Vec::new();
    for tag in raw {
        let tag = tag.trim().trim_start_matches('#').trim();
        if tag.is_empty() {
            continue;
        }
        let tag = format!("#{}", tag.split_whitespace().collect::<String>());
        if !hashtags.contains(&tag) {
            hashtags.push(tag);
        }
        if hashtags.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    Ok(hashtags)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    body.trim_end().trim_end_matches("```").trim()
}
