//! Groq chat-completion client
//!
//! Groq exposes an OpenAI-compatible `/chat/completions` endpoint, so this
//! client speaks that wire format and nothing Groq-specific.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{ChatMessage, LlmClient};
use crate::error::LlmError;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

pub struct GroqClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqClient {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<String, LlmError> {
        let status = response.status();

        if status.is_success() {
            let body: ChatResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Deserialization(e.to_string()))?;
            first_content(body)
        } else if status.as_u16() == 401 {
            Err(LlmError::Unauthorized)
        } else if status.as_u16() == 429 {
            Err(LlmError::RateLimited)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(LlmError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl fmt::Debug for GroqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroqClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

fn first_content(body: ChatResponse) -> Result<String, LlmError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        tracing::debug!(model = %self.model, messages = messages.len(), "Requesting chat completion");

        let resp = self
            .http
            .post(self.api_url("/chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
            })
            .send()
            .await?;

        self.handle_response(resp).await
    }
}
