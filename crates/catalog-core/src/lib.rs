//! Core traits and types for the course catalog assistant
//!
//! This crate defines the course record, the instructor alias registry, the
//! in-memory catalog and the capability-facing interfaces for chat
//! completion, embeddings and vector search, so the rest of the system can
//! be exercised against deterministic stand-ins.

pub mod catalog;
pub mod course;
pub mod embedder;
pub mod error;
pub mod instructor;
pub mod llm;
pub mod types;
pub mod vector_store;

pub use catalog::CourseCatalog;
pub use course::{Course, FIELD_COUNT};
pub use embedder::Embedder;
pub use error::{Error, Result};
pub use instructor::{AliasRegistry, Instructor, canonicalize, substitute_aliases};
pub use llm::{ChatMessage, ChatRole, GenerationConfig, GenerationResult, LLMProvider};
pub use types::RetryConfig;
pub use vector_store::{SearchConfig, SearchResult, VectorDocument, VectorStore};
