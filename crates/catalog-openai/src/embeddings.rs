//! OpenAI embedding client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use catalog_core::{Embedder, Error, Result, RetryConfig};

use crate::client::{request_error, status_error};
use crate::config::OpenAIConfig;

/// Inputs sent per embeddings request
const BATCH_SIZE: usize = 64;

/// Embeds text through the OpenAI embeddings endpoint
pub struct OpenAIEmbedder {
    config: OpenAIConfig,
    client: Client,
    retry: RetryConfig,
    dimension: u64,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAIEmbedder {
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        let dimension = model_dimension(&config.embedding_model);

        Ok(Self {
            config,
            client,
            retry: RetryConfig::default(),
            dimension,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }

    /// Override the timeout and retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    async fn send_batch(&self, input: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input,
        };

        let response = self
            .client
            .post(self.config.endpoint("embeddings"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status_error("embeddings", status, &error_text) {
                Error::LLMProvider(message) => Error::Embedding(message),
                other => other,
            });
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        into_ordered_vectors(body, input.len())
    }
}

/// Vectors in request order; the endpoint tags each one with its input index
fn into_ordered_vectors(mut body: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    if body.data.len() != expected {
        return Err(Error::Embedding(format!(
            "expected {} embeddings, got {}",
            expected,
            body.data.len()
        )));
    }
    body.data.sort_by_key(|d| d.index);
    Ok(body.data.into_iter().map(|d| d.embedding).collect())
}

fn model_dimension(model: &str) -> u64 {
    match model {
        "text-embedding-3-large" => 3072,
        _ => 1536,
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            debug!(inputs = batch.len(), model = %self.config.embedding_model, "requesting embeddings");
            let embedded = self
                .retry
                .run("embeddings", move || self.send_batch(batch))
                .await?;
            vectors.extend(embedded);
        }

        Ok(vectors)
    }

    fn dimension(&self) -> u64 {
        self.dimension
    }
}
