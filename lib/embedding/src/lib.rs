//! # MagicSearch Embedding
//!
//! Clients that turn text into vectors.
//!
//! - [`HttpEmbeddingClient`] - calls a remote Ollama-style `/api/embed` endpoint
//! - [`HashingEmbeddingClient`] - deterministic local vectors from hashed trigrams,
//!   for offline runs and tests
//!
//! Both implement [`EmbeddingClient`], the seam the search engine and the
//! indexer depend on.

pub mod hashing;
pub mod http;

pub use hashing::HashingEmbeddingClient;
pub use http::{EmbeddingConfig, HttpEmbeddingClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use async_trait::async_trait;
use magicsearch_core::{Result, Vector};

/// Text to vector. Every failure, whatever the cause, surfaces as
/// [`magicsearch_core::Error::EmbeddingUnavailable`].
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn vectorize(&self, text: &str) -> Result<Vector>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}
