//! # MagicSearch
//!
//! Filtered semantic search over a trading-card catalog.
//!
//! A query combines free-form intent ("cheap red removal"), embedded into a
//! vector and matched by nearest-neighbor distance, with structured attribute
//! predicates (`colors`, `mana_value__lte`, ...). Filters are compiled against
//! a fixed attribute schema, applied before ranking, and the ranked set is
//! paged with a stable tie-break.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! magicsearch --cards data/cards.json --embed-missing --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use magicsearch::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> magicsearch::Result<()> {
//! let store = Arc::new(InMemoryCardStore::default());
//! let mut bolt = Card::new("Lightning Bolt", "Lightning Bolt").with_id(1);
//! bolt.card_type = Some("Instant".into());
//! bolt.mana_cost = Some("{R}".into());
//! store.upsert(bolt)?;
//!
//! let embedder = Arc::new(HashingEmbeddingClient::new(256));
//! Indexer::new(store.clone(), embedder.clone())
//!     .refresh_missing(&RefreshOptions::default())
//!     .await;
//!
//! let engine = SearchEngine::new(store, embedder, SearchConfig::default());
//! let query = SearchQuery::text("red instant that deals damage")
//!     .with_filters(FilterSpec::new().with("colors", serde_json::json!(["R"])))
//!     .with_limit(5);
//! let results = engine.search(query).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - `magicsearch-core` - Card model, attribute schema, predicate compiler, card store
//! - `magicsearch-text` - Cost-symbol normalization and embeddable-text construction
//! - `magicsearch-embedding` - Embedding provider clients
//! - `magicsearch-storage` - Snapshots and dataset import
//! - `magicsearch-engine` - Search orchestration and embedding refresh
//! - `magicsearch-api` - REST API

// Re-export core types
pub use magicsearch_core::{
    compile, AttributeKind, AttributeSchema, Card, CardId, CardProjection, CardStore, Color,
    Distance, Error, Filter, FilterSpec, InMemoryCardStore, Predicate, Result, StoreConfig,
    Vector,
};

// Re-export text
pub use magicsearch_text::{build_embeddable_text, normalize, CardTextBuilder};

// Re-export embedding
pub use magicsearch_embedding::{
    EmbeddingClient, EmbeddingConfig, HashingEmbeddingClient, HttpEmbeddingClient,
};

// Re-export storage
pub use magicsearch_storage::{load_dataset, restore_into, SnapshotStore};

// Re-export engine
pub use magicsearch_engine::{
    Indexer, RefreshOptions, RefreshReport, SearchConfig, SearchEngine, SearchHit, SearchQuery,
    SearchResult,
};

// Re-export API
pub use magicsearch_api::{ApiError, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Card, CardStore, Color, EmbeddingClient, Error, FilterSpec, HashingEmbeddingClient,
        HttpEmbeddingClient, InMemoryCardStore, Indexer, RefreshOptions, Result, SearchConfig,
        SearchEngine, SearchQuery, SearchResult, Vector,
    };
}
