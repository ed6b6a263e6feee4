use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, error};

pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Failure of a single chat-completion call. Every variant carries the
/// upstream's own error text.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("network error: {0}")] Network(String),
    #[error("authentication failed: {0}")] Authentication(String),
    #[error("rate limited: {0}")] RateLimited(String),
    #[error("upstream returned status {status}: {body}")] Status { status: u16, body: String },
    #[error("malformed response: {0}")] MalformedResponse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Anything that can turn a chat request into the text of one completion.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, UpstreamError>;
}

pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn perform_api_call(&self, request: &ChatRequest) -> Result<String, UpstreamError> {
        let url = format!("{}/chat/completions", self.base_url);
        info!("🔗 Making request to: {} (model={})", url, request.model);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await
            .map_err(|e| UpstreamError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("❌ API Error response: {}", preview(&response_text, 500));
            return Err(classify_status(status, response_text));
        }

        let parsed: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| UpstreamError::MalformedResponse(format!("parse error: {}: {}", e, preview(&response_text, 200))))?;

        let content = first_completion(parsed)
            .ok_or_else(|| UpstreamError::MalformedResponse("no completion content in response".into()))?;
        info!("✅ Received completion ({} chars): {}", content.len(), preview(&content, 80));
        Ok(content)
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, UpstreamError> {
        self.perform_api_call(request).await
    }
}

fn classify_status(status: StatusCode, body: String) -> UpstreamError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamError::Authentication(body),
        StatusCode::TOO_MANY_REQUESTS => UpstreamError::RateLimited(body),
        other => UpstreamError::Status { status: other.as_u16(), body },
    }
}

/// Shortens long text for log lines, respecting char boundaries.
pub(crate) fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...[{} chars total]", &text[..idx], text.chars().count()),
        None => text.to_string(),
    }
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice { message: ResponseMessage }

#[derive(Debug, Deserialize)]
struct ResponseMessage { #[serde(default)] content: Option<String> }

fn first_completion(resp: ChatResponse) -> Option<String> {
    resp.choices.into_iter().next().and_then(|c| c.message.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_codes_map_to_error_kinds() {
        assert!(matches!(classify_status(StatusCode::UNAUTHORIZED, "bad key".into()), UpstreamError::Authentication(b) if b == "bad key"));
        assert!(matches!(classify_status(StatusCode::FORBIDDEN, String::new()), UpstreamError::Authentication(_)));
        assert!(matches!(classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()), UpstreamError::RateLimited(_)));
        assert!(matches!(classify_status(StatusCode::BAD_GATEWAY, String::new()), UpstreamError::Status { status: 502, .. }));
    }

    #[test]
    fn error_messages_embed_upstream_text() {
        let err = UpstreamError::RateLimited("rate limit exceeded".into());
        assert!(err.to_string().contains("rate limit exceeded"));
    }

    #[test]
    fn first_choice_content_is_taken_verbatim() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"```jsx\nexport default App;\n```"}},{"index":1,"message":{"role":"assistant","content":"second"}}]}"#,
        ).unwrap();
        assert_eq!(first_completion(resp).as_deref(), Some("```jsx\nexport default App;\n```"));
    }

    #[test]
    fn missing_choices_or_content_yield_nothing() {
        let empty: ChatResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(first_completion(empty), None);
        let null: ChatResponse = serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
        assert_eq!(first_completion(null), None);
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("ééééé", 2), "éé...[5 chars total]");
    }
}
