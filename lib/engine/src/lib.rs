//! # MagicSearch Engine
//!
//! Orchestrates a search: resolve the query vector, compile the filters,
//! issue one ranked read against the card store. The [`Indexer`] keeps the
//! derived fields (embeddable text and embedding) of stored cards current.

pub mod indexer;
pub mod search;

pub use indexer::{Indexer, RefreshOptions, RefreshReport};
pub use search::{QueryInput, SearchConfig, SearchEngine, SearchHit, SearchQuery, SearchResult};
