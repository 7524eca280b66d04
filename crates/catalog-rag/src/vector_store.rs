//! Vector store implementations

use async_trait::async_trait;
use qdrant_client::qdrant::point_id::PointIdOptions;
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    CountPointsBuilder, CreateCollectionBuilder, Distance, PointId, PointStruct, ScoredPoint,
    SearchPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use serde_json::json;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use catalog_core::{
    Embedder, Error, Result, RetryConfig, SearchConfig, SearchResult, VectorDocument, VectorStore,
};

/// Local in-memory vector store, scored by word overlap
///
/// Used when no vector database is available and as the test double for
/// the course index.
pub struct LocalVectorStore {
    documents: RwLock<Vec<VectorDocument>>,
    connected: bool,
}

impl LocalVectorStore {
    /// Create a new local vector store
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
            connected: false,
        }
    }

    /// Fraction of the query's words present in `content`
    fn text_similarity(query: &str, content: &str) -> f32 {
        let content_lower = content.to_lowercase();

        let query_words: Vec<String> = query
            .split_whitespace()
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect();

        if query_words.is_empty() {
            return 0.0;
        }

        let matches = query_words
            .iter()
            .filter(|word| content_lower.contains(word.as_str()))
            .count();

        matches as f32 / query_words.len() as f32
    }
}

impl Default for LocalVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        let mut docs = self
            .documents
            .write()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let mut ids = Vec::with_capacity(documents.len());
        for document in documents {
            ids.push(document.id.clone());
            match docs.iter_mut().find(|existing| existing.id == document.id) {
                Some(existing) => *existing = document,
                None => docs.push(document),
            }
        }

        Ok(ids)
    }

    async fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
        let docs = self
            .documents
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;

        let threshold = config.score_threshold.unwrap_or(0.0);
        let mut results: Vec<VectorDocument> = docs
            .iter()
            .map(|doc| {
                let mut doc_with_score = doc.clone();
                doc_with_score.score = Some(Self::text_similarity(query, &doc.content));
                doc_with_score
            })
            .filter(|doc| {
                let score = doc.score.unwrap_or(0.0);
                score > 0.0 && score >= threshold
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        results.sort_by(|a, b| b.score.unwrap_or(0.0).total_cmp(&a.score.unwrap_or(0.0)));
        results.truncate(config.top_k);

        let total = results.len();
        Ok(SearchResult {
            documents: results,
            total,
        })
    }

    async fn count(&self) -> Result<usize> {
        let docs = self
            .documents
            .read()
            .map_err(|e| Error::VectorStore(format!("Lock error: {}", e)))?;
        Ok(docs.len())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// Qdrant vector store; text is embedded with `E` before storage and search
pub struct QdrantVectorStore<E: Embedder> {
    url: String,
    collection_name: String,
    timeout: Duration,
    retry: RetryConfig,
    embedder: E,
    client: Option<Qdrant>,
}

impl<E: Embedder> QdrantVectorStore<E> {
    pub fn new(url: &str, collection_name: &str, embedder: E) -> Self {
        Self {
            url: url.to_string(),
            collection_name: collection_name.to_string(),
            timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            embedder,
            client: None,
        }
    }

    /// Per-request timeout for every Qdrant call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the retry policy applied to every Qdrant call
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn client(&self) -> Result<&Qdrant> {
        self.client
            .as_ref()
            .ok_or_else(|| Error::VectorStore("Not connected. Call connect() first.".to_string()))
    }

    /// Create the collection for the embedder's dimension if it is missing
    async fn ensure_collection(&self, client: &Qdrant) -> Result<()> {
        let exists = self
            .retry
            .run("qdrant collection check", move || async move {
                client
                    .collection_exists(self.collection_name.clone())
                    .await
                    .map_err(qdrant_error)
            })
            .await?;

        if !exists {
            client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection_name).vectors_config(
                        VectorParamsBuilder::new(self.embedder.dimension(), Distance::Cosine),
                    ),
                )
                .await
                .map_err(qdrant_error)?;
            info!(collection = %self.collection_name, "created Qdrant collection");
        }

        Ok(())
    }
}

/// Map a Qdrant failure; unavailable or throttled servers are transient
fn qdrant_error(e: qdrant_client::QdrantError) -> Error {
    match &e {
        qdrant_client::QdrantError::ResponseError { status } => {
            status_error(&format!("{:?}", status.code()), e.to_string())
        }
        _ => Error::VectorStore(e.to_string()),
    }
}

fn status_error(code: &str, message: String) -> Error {
    match code {
        "DeadlineExceeded" => Error::Timeout(message),
        "Unavailable" | "ResourceExhausted" | "Aborted" => Error::Network(message),
        _ => Error::VectorStore(message),
    }
}

/// Numeric ids are kept; anything else gets a fresh UUID
fn point_id(id: &str) -> PointId {
    match id.parse::<u64>() {
        Ok(num) => PointId::from(num),
        Err(_) => PointId::from(Uuid::new_v4().to_string()),
    }
}

fn string_value(value: &Value) -> Option<&str> {
    match &value.kind {
        Some(Kind::StringValue(s)) => Some(s.as_str()),
        _ => None,
    }
}

fn scored_point_to_document(point: ScoredPoint) -> VectorDocument {
    let id = match point.id.and_then(|id| id.point_id_options) {
        Some(PointIdOptions::Num(num)) => num.to_string(),
        Some(PointIdOptions::Uuid(uuid)) => uuid,
        None => "unknown".to_string(),
    };

    let content = point
        .payload
        .get("content")
        .and_then(string_value)
        .unwrap_or_default()
        .to_string();

    let metadata: HashMap<&str, &str> = point
        .payload
        .iter()
        .filter(|(key, _)| key.as_str() != "content")
        .filter_map(|(key, value)| string_value(value).map(|s| (key.as_str(), s)))
        .collect();

    VectorDocument {
        id,
        content,
        metadata: json!(metadata),
        score: Some(point.score),
    }
}

#[async_trait]
impl<E: Embedder> VectorStore for QdrantVectorStore<E> {
    async fn connect(&mut self) -> Result<()> {
        let client = Qdrant::from_url(&self.url)
            .timeout(self.timeout)
            .build()
            .map_err(qdrant_error)?;

        self.ensure_collection(&client).await?;
        self.client = Some(client);
        Ok(())
    }

    async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let client = self.client()?;

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedder.embed(&texts).await?;

        let mut ids = Vec::with_capacity(documents.len());
        let mut points = Vec::with_capacity(documents.len());
        for (document, vector) in documents.into_iter().zip(vectors) {
            let mut payload = json!({ "content": document.content });
            if let (Some(target), Some(extra)) =
                (payload.as_object_mut(), document.metadata.as_object())
            {
                for (key, value) in extra {
                    target.insert(key.clone(), value.clone());
                }
            }
            let payload = Payload::try_from(payload).map_err(qdrant_error)?;

            points.push(PointStruct::new(point_id(&document.id), vector, payload));
            ids.push(document.id);
        }

        // Ids are stable, so a repeated upsert after a lost reply is harmless.
        let request = UpsertPointsBuilder::new(&self.collection_name, points)
            .wait(true)
            .build();
        let request = &request;
        self.retry
            .run("qdrant upsert", move || async move {
                client.upsert_points(request.clone()).await.map_err(qdrant_error)
            })
            .await?;

        debug!(collection = %self.collection_name, stored = ids.len(), "upserted points");
        Ok(ids)
    }

    async fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
        let client = self.client()?;

        let vector = self
            .embedder
            .embed(&[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no embedding returned for query".to_string()))?;

        let mut builder =
            SearchPointsBuilder::new(&self.collection_name, vector, config.top_k as u64)
                .with_payload(true);
        if let Some(threshold) = config.score_threshold {
            builder = builder.score_threshold(threshold);
        }
        let request = builder.build();
        let request = &request;

        let response = self
            .retry
            .run("qdrant search", move || async move {
                client.search_points(request.clone()).await.map_err(qdrant_error)
            })
            .await?;

        let documents: Vec<VectorDocument> = response
            .result
            .into_iter()
            .map(scored_point_to_document)
            .collect();
        let total = documents.len();

        Ok(SearchResult { documents, total })
    }

    async fn count(&self) -> Result<usize> {
        let client = self.client()?;
        let request = CountPointsBuilder::new(&self.collection_name).exact(true).build();
        let request = &request;
        let response = self
            .retry
            .run("qdrant count", move || async move {
                client.count(request.clone()).await.map_err(qdrant_error)
            })
            .await?;

        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }

    fn is_connected(&self) -> bool {
        self.client.is_some()
    }
}
