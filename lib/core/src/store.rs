use crate::{Card, CardId, Distance, Error, Filter, Predicate, Result, Vector};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Configuration for a card store
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Embedding dimension. When `None` the first stored vector fixes it.
    pub vector_dim: Option<usize>,
    pub distance: Distance,
}

/// Persistence layer the search core reads from and writes derived fields to.
///
/// Implementations evaluate a conjunction of predicates, rank the surviving
/// rows by distance to a query vector, and page the ranked set. Rows with no
/// embedding (or an embedding of a different dimension than the query) never
/// take part in ranking.
pub trait CardStore: Send + Sync {
    /// Filtered, ranked, paginated read. Results are ordered by ascending
    /// distance; equal distances keep insertion order.
    fn ranked(
        &self,
        query: &Vector,
        predicates: &[Predicate],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<(Card, f32)>>;

    fn get(&self, id: CardId) -> Option<Card>;

    fn get_by_key(&self, key: &str) -> Option<Card>;

    /// Insert or replace a card. The card must carry an id.
    fn upsert(&self, card: Card) -> Result<()>;

    /// Persist a card's embeddable text. Writing a different text than the
    /// stored one clears the stored embedding.
    fn set_embeddable_text(&self, id: CardId, text: String) -> Result<()>;

    fn set_embedding(&self, id: CardId, embedding: Vector) -> Result<()>;

    /// Ids of cards that still have no embedding, ascending
    fn missing_embeddings(&self) -> Vec<CardId>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cards in insertion order
    fn cards(&self) -> Vec<Card>;

    fn distance(&self) -> Distance;
}

struct Entry {
    seq: u64,
    card: Card,
}

type CardMap = HashMap<CardId, Entry, ahash::RandomState>;

#[derive(Default)]
struct Inner {
    cards: CardMap,
    keys: HashMap<String, CardId, ahash::RandomState>,
    vector_dim: Option<usize>,
}

impl Inner {
    /// Checks a vector against the enforced dimension without recording it
    fn check_dim(&self, embedding: &Vector) -> Result<()> {
        if embedding.is_empty() {
            return Err(Error::InvalidState("embedding vector is empty".to_string()));
        }
        match self.vector_dim {
            Some(expected) if expected != embedding.dim() => Err(Error::InvalidDimension {
                expected,
                actual: embedding.dim(),
            }),
            _ => Ok(()),
        }
    }

    /// Call only after every check on the write has passed
    fn fix_dim(&mut self, embedding: &Vector) {
        self.vector_dim.get_or_insert(embedding.dim());
    }
}

/// Card store held entirely in memory. Ranking is an exact parallel scan.
pub struct InMemoryCardStore {
    config: StoreConfig,
    inner: RwLock<Inner>,
    next_seq: AtomicU64,
}

impl InMemoryCardStore {
    pub fn new(config: StoreConfig) -> Self {
        let inner = Inner {
            vector_dim: config.vector_dim,
            ..Inner::default()
        };
        Self {
            config,
            inner: RwLock::new(inner),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Embedding dimension currently enforced, if any
    pub fn vector_dim(&self) -> Option<usize> {
        self.inner.read().vector_dim
    }

    /// Remove a card by id
    pub fn delete(&self, id: CardId) -> bool {
        let mut inner = self.inner.write();
        match inner.cards.remove(&id) {
            Some(entry) => {
                inner.keys.remove(&entry.card.card_key);
                true
            }
            None => false,
        }
    }
}

impl Default for InMemoryCardStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl CardStore for InMemoryCardStore {
    fn ranked(
        &self,
        query: &Vector,
        predicates: &[Predicate],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<(Card, f32)>> {
        if limit == 0 || query.is_empty() {
            return Ok(Vec::new());
        }

        let distance = self.config.distance;
        let inner = self.inner.read();

        let mut scored: Vec<(OrderedFloat<f32>, u64, CardId)> = inner
            .cards
            .par_iter()
            .filter_map(|(id, entry)| {
                let embedding = entry.card.embedding.as_ref()?;
                if embedding.dim() != query.dim() || !predicates.matches(&entry.card) {
                    return None;
                }
                let d = distance.between(query, embedding);
                if d.is_nan() {
                    return None;
                }
                Some((OrderedFloat(d), entry.seq, *id))
            })
            .collect();

        scored.par_sort_unstable_by_key(|&(d, seq, _)| (d, seq));
        tracing::trace!(candidates = scored.len(), offset, limit, "ranked scan");

        Ok(scored
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(d, _, id)| inner.cards.get(&id).map(|e| (e.card.clone(), d.into_inner())))
            .collect())
    }

    fn get(&self, id: CardId) -> Option<Card> {
        self.inner.read().cards.get(&id).map(|e| e.card.clone())
    }

    fn get_by_key(&self, key: &str) -> Option<Card> {
        let inner = self.inner.read();
        inner
            .keys
            .get(key)
            .and_then(|id| inner.cards.get(id))
            .map(|e| e.card.clone())
    }

    fn upsert(&self, card: Card) -> Result<()> {
        let id = card.id.ok_or_else(|| {
            Error::InvalidState(format!("card '{}' has no id", card.card_key))
        })?;

        let mut inner = self.inner.write();

        if let Some(&owner) = inner.keys.get(&card.card_key) {
            if owner != id {
                return Err(Error::DuplicateKey(card.card_key.clone()));
            }
        }
        if let Some(embedding) = &card.embedding {
            inner.check_dim(embedding)?;
            inner.fix_dim(embedding);
        }

        let previous = inner
            .cards
            .get(&id)
            .map(|e| (e.seq, e.card.card_key.clone()));

        let seq = match previous {
            Some((seq, old_key)) => {
                if old_key != card.card_key {
                    inner.keys.remove(&old_key);
                }
                seq
            }
            None => self.next_seq.fetch_add(1, Ordering::Relaxed),
        };

        inner.keys.insert(card.card_key.clone(), id);
        inner.cards.insert(id, Entry { seq, card });
        Ok(())
    }

    fn set_embeddable_text(&self, id: CardId, text: String) -> Result<()> {
        let mut inner = self.inner.write();
        let entry = inner.cards.get_mut(&id).ok_or(Error::CardNotFound(id))?;
        if entry.card.text_to_embed.as_deref() != Some(text.as_str()) {
            entry.card.text_to_embed = Some(text);
            entry.card.embedding = None;
        }
        Ok(())
    }

    fn set_embedding(&self, id: CardId, embedding: Vector) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.cards.contains_key(&id) {
            return Err(Error::CardNotFound(id));
        }
        inner.check_dim(&embedding)?;
        inner.fix_dim(&embedding);
        if let Some(entry) = inner.cards.get_mut(&id) {
            entry.card.embedding = Some(embedding);
        }
        Ok(())
    }

    fn missing_embeddings(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self
            .inner
            .read()
            .cards
            .iter()
            .filter(|(_, e)| !e.card.has_embedding())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn len(&self) -> usize {
        self.inner.read().cards.len()
    }

    fn cards(&self) -> Vec<Card> {
        let inner = self.inner.read();
        let mut entries: Vec<&Entry> = inner.cards.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.card.clone()).collect()
    }

    fn distance(&self) -> Distance {
        self.config.distance
    }
}
