//! Vector store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A document stored in the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    pub id: String,
    pub content: String,
    pub metadata: serde_json::Value,
    pub score: Option<f32>,
}

impl VectorDocument {
    pub fn new(id: impl Into<String>, content: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata,
            score: None,
        }
    }
}

/// Search result from vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub documents: Vec<VectorDocument>,
    pub total: usize,
}

/// Configuration for vector search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    pub score_threshold: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            score_threshold: None,
        }
    }
}

/// Trait for vector stores (e.g., Qdrant or the in-memory store)
///
/// This trait defines the interface for vector database operations the
/// catalog needs: batch storage, similarity search and a document count.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Initialize the vector store connection
    async fn connect(&mut self) -> Result<()>;

    /// Store multiple documents in batch, replacing any with the same id
    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>>;

    /// Search for documents similar to `query`
    async fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult>;

    /// Get the total number of documents
    async fn count(&self) -> Result<usize>;

    /// Check if the vector store is connected
    fn is_connected(&self) -> bool;
}
