//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Configuration for a chat completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "gpt-4o-mini".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

/// Result of a chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
    pub model_id: String,
    pub tokens_used: Option<u32>,
}

/// Trait for chat-completion providers
///
/// The router only ever needs "answer this question under this system
/// prompt"; richer calls go through `chat_completion_with_config`.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Answer `question` with `system_message` as the instructional context
    async fn chat_completion(&self, question: &str, system_message: &str) -> Result<String> {
        let messages = [ChatMessage::system(system_message), ChatMessage::user(question)];
        let config = GenerationConfig {
            model_id: self.model_id().to_string(),
            ..Default::default()
        };
        let result = self.chat_completion_with_config(&messages, &config).await?;
        Ok(result.text)
    }

    /// Run a chat completion over explicit messages and configuration
    async fn chat_completion_with_config(
        &self,
        messages: &[ChatMessage],
        config: &GenerationConfig,
    ) -> Result<GenerationResult>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
