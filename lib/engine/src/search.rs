use magicsearch_core::{
    compile, AttributeSchema, CardId, CardProjection, CardStore, Error, FilterSpec, Result, Vector,
};
use magicsearch_embedding::EmbeddingClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Page size limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 300,
        }
    }
}

impl SearchConfig {
    /// Effective page size. Non-positive limits are rejected, oversized ones clamped.
    pub fn resolve_limit(&self, requested: Option<i64>) -> Result<usize> {
        match requested {
            None => Ok(self.default_limit.min(self.max_limit)),
            Some(limit) if limit <= 0 => Err(Error::InvalidLimit(limit)),
            Some(limit) => Ok(usize::try_from(limit).unwrap_or(usize::MAX).min(self.max_limit)),
        }
    }
}

/// What the query is matched against
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    /// Natural-language intent, embedded as-is
    Text(String),
    /// Precomputed query vector
    Vector(Vector),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub input: QueryInput,
    pub filters: FilterSpec,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(QueryInput::Text(text.into()))
    }

    pub fn vector(vector: Vector) -> Self {
        Self::new(QueryInput::Vector(vector))
    }

    fn new(input: QueryInput) -> Self {
        Self {
            input,
            filters: FilterSpec::default(),
            limit: None,
            offset: 0,
        }
    }

    /// Exactly one of `text` and `vector` must be given
    pub fn from_parts(text: Option<String>, vector: Option<Vec<f32>>) -> Result<Self> {
        match (text, vector) {
            (Some(_), Some(_)) => Err(Error::InvalidQuery(
                "provide either text or vector, not both".to_string(),
            )),
            (None, None) => Err(Error::InvalidQuery(
                "a query needs text or a vector".to_string(),
            )),
            (Some(text), None) => Ok(Self::text(text)),
            (None, Some(vector)) => Ok(Self::vector(Vector::new(vector))),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: FilterSpec) -> Self {
        self.filters = filters;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub card: CardProjection,
    pub distance: f32,
}

/// Hits ordered by ascending distance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub hits: Vec<SearchHit>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn ids(&self) -> Vec<CardId> {
        self.hits.iter().filter_map(|h| h.card.id).collect()
    }
}

/// Filtered semantic search over a card store
#[derive(Clone)]
pub struct SearchEngine {
    store: Arc<dyn CardStore>,
    embedder: Arc<dyn EmbeddingClient>,
    schema: Arc<AttributeSchema>,
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(
        store: Arc<dyn CardStore>,
        embedder: Arc<dyn EmbeddingClient>,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            schema: Arc::new(AttributeSchema::cards()),
            config,
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: AttributeSchema) -> Self {
        self.schema = Arc::new(schema);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn CardStore> {
        &self.store
    }

    /// Run a query. Request errors (limit, filters, query shape) are reported
    /// before the embedding provider is called.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResult> {
        let limit = self.config.resolve_limit(query.limit)?;
        let offset = usize::try_from(query.offset).map_err(|_| {
            Error::InvalidQuery(format!("offset must not be negative, got {}", query.offset))
        })?;
        let predicates = compile(&query.filters, &self.schema)?;

        let vector = match query.input {
            QueryInput::Text(text) => {
                if text.trim().is_empty() {
                    return Err(Error::InvalidQuery("query text is blank".to_string()));
                }
                self.embedder.vectorize(&text).await?
            }
            QueryInput::Vector(vector) => vector,
        };
        if vector.is_empty() {
            return Err(Error::InvalidQuery("query vector is empty".to_string()));
        }

        tracing::debug!(
            "Searching with {} predicate(s), offset {}, limit {}",
            predicates.len(),
            offset,
            limit
        );

        let store = Arc::clone(&self.store);
        let rows = tokio::task::spawn_blocking(move || {
            store.ranked(&vector, &predicates, offset, limit)
        })
        .await
        .map_err(|e| Error::Storage(format!("search worker failed: {}", e)))??;

        let hits = rows
            .into_iter()
            .map(|(card, distance)| SearchHit {
                card: CardProjection::from(&card),
                distance,
            })
            .collect();
        Ok(SearchResult { hits })
    }

    /// Projection of a single card
    pub fn card(&self, id: CardId) -> Result<CardProjection> {
        self.store
            .get(id)
            .map(|card| CardProjection::from(&card))
            .ok_or(Error::CardNotFound(id))
    }
}
