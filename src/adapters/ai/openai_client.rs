//! OpenAI Client - Implementation of CompletionClient for OpenAI's chat API.
//!
//! Sends the whole transcript to `/chat/completions` in one non-streaming
//! call and returns the first choice's content.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-3.5-turbo")
//!     .with_timeout(Duration::from_secs(60));
//!
//! let client = OpenAICompletionClient::new(config)?;
//! ```
//!
//! # Failures
//!
//! Every failure is logged here with its detail and then collapsed into an
//! opaque [`CompletionError`]. A response without usable content is not a
//! failure: it yields [`FALLBACK_REPLY`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::ports::{ChatMessage, CompletionClient, CompletionError, FALLBACK_REPLY};

/// Configuration for the OpenAI client.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Upper bound on generated tokens per reply.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Bound on the whole completion call.
    pub timeout: Duration,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI chat completion client.
pub struct OpenAICompletionClient {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAICompletionClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Builds the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, messages: &[ChatMessage]) -> OpenAIRequest {
        OpenAIRequest {
            model: self.config.model.clone(),
            messages: messages
                .iter()
                .map(|m| OpenAIMessage {
                    role: m.role.as_str().to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    async fn send_request(&self, messages: &[ChatMessage]) -> Result<Response, CompletionError> {
        let request = self.to_openai_request(messages);

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    tracing::error!(
                        timeout_secs = self.config.timeout.as_secs(),
                        "OpenAI request timed out"
                    );
                    CompletionError::timeout()
                } else {
                    tracing::error!(error = %e, "OpenAI request failed");
                    CompletionError::transport()
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<String, CompletionError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "OpenAI returned an error status");
            return Err(CompletionError::upstream());
        }

        let parsed: OpenAIResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to decode OpenAI response");
            CompletionError::decode()
        })?;

        Ok(extract_reply(parsed))
    }

    async fn call(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let response = self.send_request(messages).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl CompletionClient for OpenAICompletionClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending completion request"
        );

        match tokio::time::timeout(self.config.timeout, self.call(messages)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.config.timeout.as_secs(),
                    "OpenAI completion exceeded its deadline"
                );
                Err(CompletionError::timeout())
            }
        }
    }
}

/// First choice's content, or the fallback when it is missing or empty.
fn extract_reply(response: OpenAIResponse) -> String {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty());

    match content {
        Some(content) => content,
        None => {
            tracing::warn!("OpenAI response carried no content, using fallback reply");
            FALLBACK_REPLY.to_string()
        }
    }
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}
