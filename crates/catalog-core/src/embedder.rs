//! Embedding provider trait

use async_trait::async_trait;

use crate::Result;

/// Trait for text embedding providers
///
/// Implementations return one vector per input text, in input order, each
/// of length `dimension()`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Length of every vector produced by `embed`
    fn dimension(&self) -> u64;
}
