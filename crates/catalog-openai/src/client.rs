//! OpenAI chat completion client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use catalog_core::{
    ChatMessage, Error, GenerationConfig, GenerationResult, LLMProvider, Result, RetryConfig,
};

use crate::config::OpenAIConfig;

/// OpenAI chat completion client
pub struct OpenAIClient {
    config: OpenAIConfig,
    client: Client,
    retry: RetryConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
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
struct Usage {
    total_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            config,
            client,
            retry: RetryConfig::default(),
        })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig::from_env()?;
        Self::new(config)
    }

    /// Set the chat model
    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.config.chat_model = model_id.into();
        self
    }

    /// Override the timeout and retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Perform one chat completion request
    async fn send_chat(&self, request: &ChatRequest<'_>) -> Result<GenerationResult> {
        let response = self
            .client
            .post(self.config.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error("chat completion", status, &error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::LLMProvider("response contained no choices".to_string()))?;

        Ok(GenerationResult {
            text,
            model_id: request.model.to_string(),
            tokens_used: body.usage.map(|u| u.total_tokens),
        })
    }
}

/// Map a transport failure onto the error taxonomy
pub(crate) fn request_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Network(e.to_string())
    }
}

/// Map a non-success HTTP status; throttling and server faults are transient
pub(crate) fn status_error(call: &str, status: StatusCode, body: &str) -> Error {
    let message = format!("{} request failed with status {}: {}", call, status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => Error::Network(message),
        s if s.is_server_error() => Error::Network(message),
        _ => Error::LLMProvider(message),
    }
}

#[async_trait]
impl LLMProvider for OpenAIClient {
    async fn chat_completion_with_config(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request = ChatRequest {
            model: &config.model_id,
            messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };
        debug!(model = %config.model_id, messages = messages.len(), "sending chat completion");

        let request = &request;
        self.retry
            .run("chat completion", move || self.send_chat(request))
            .await
    }

    fn model_id(&self) -> &str {
        &self.config.chat_model
    }
}
