//! OpenAI integration for the course catalog assistant
//!
//! This crate provides the OpenAI implementations of the `LLMProvider` and
//! `Embedder` traits.

mod client;
mod config;
mod embeddings;


pub use client::OpenAIClient;
pub use config::{DEFAULT_API_URL, DEFAULT_CHAT_MODEL, DEFAULT_EMBEDDING_MODEL, OpenAIConfig};
pub use embeddings::OpenAIEmbedder;

// Re-export core types for convenience
pub use catalog_core::{
    ChatMessage, Embedder, Error, GenerationConfig, GenerationResult, LLMProvider, Result,
    RetryConfig,
};
