//! # MagicSearch Core
//!
//! Core library for the MagicSearch card search engine.
//!
//! This crate provides the data model and the structured half of search:
//!
//! - [`Card`] - A card record with its derived embeddable text and embedding
//! - [`Vector`] - Dense embedding vector and [`Distance`] metrics
//! - [`AttributeSchema`] - The statically enumerated filterable attributes
//! - [`compile`] - The predicate compiler turning a [`FilterSpec`] into [`Predicate`]s
//! - [`CardStore`] - The store interface, with [`InMemoryCardStore`]
//!
//! ## Example
//!
//! ```rust
//! use magicsearch_core::{
//!     compile, AttributeSchema, Card, CardStore, Color, FilterSpec, InMemoryCardStore, Vector,
//! };
//!
//! let store = InMemoryCardStore::default();
//! let mut card = Card::new("Island", "Island").with_id(1);
//! card.colors = vec![Color::Blue];
//! store.upsert(card.with_embedding(Vector::new(vec![1.0, 0.0]))).unwrap();
//!
//! let filters = FilterSpec::new().with("colors", serde_json::json!(["U"]));
//! let predicates = compile(&filters, &AttributeSchema::cards()).unwrap();
//! let results = store.ranked(&Vector::new(vec![1.0, 0.0]), &predicates, 0, 10).unwrap();
//! assert_eq!(results.len(), 1);
//! ```

pub mod card;
pub mod error;
pub mod filter;
pub mod schema;
pub mod store;
pub mod vector;

pub use card::{Card, CardId, CardProjection, Color, Column};
pub use error::{Error, Result};
pub use filter::{compile, split_key, Filter, FilterSpec, Operator, Predicate, RangeOp, Scalar};
pub use schema::{AttributeKind, AttributeSchema};
pub use store::{CardStore, InMemoryCardStore, StoreConfig};
pub use vector::{Distance, Vector};
