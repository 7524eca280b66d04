//! Vector search for the course catalog assistant
//!
//! This crate provides the vector store implementations and the course
//! index that feeds them and queries them on behalf of the router.

mod index;
mod vector_store;


pub use index::{Collection, CourseIndex, IndexingResult};
pub use vector_store::{LocalVectorStore, QdrantVectorStore};

// Re-export core types for convenience
pub use catalog_core::{
    Embedder, Error, Result, SearchConfig, SearchResult, VectorDocument, VectorStore,
};
