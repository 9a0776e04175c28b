//! Derived-state refresh
//!
//! Recomputes a card's embeddable text and embedding and writes both back
//! through the store. The batch job walks every card still missing an
//! embedding; a failure on one card is logged and recorded and the job moves
//! on, so re-running it picks up exactly what is left.

use magicsearch_core::{Card, CardId, CardStore, Error, Result};
use magicsearch_embedding::EmbeddingClient;
use magicsearch_text::CardTextBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOptions {
    /// Sleep between cards, to stay under a provider's rate limit
    pub pause: Option<Duration>,
    /// Log progress every this many cards
    pub progress_every: usize,
    /// Stop after this many cards
    pub max_cards: Option<usize>,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            pause: None,
            progress_every: 100,
            max_cards: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Cards missing an embedding when the run started
    pub pending: usize,
    pub refreshed: usize,
    /// Card id and cause, in processing order
    pub failed: Vec<(CardId, String)>,
}

impl RefreshReport {
    pub fn attempted(&self) -> usize {
        self.refreshed + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.refreshed == self.pending
    }
}

pub struct Indexer {
    store: Arc<dyn CardStore>,
    embedder: Arc<dyn EmbeddingClient>,
    builder: CardTextBuilder,
}

impl Indexer {
    pub fn new(store: Arc<dyn CardStore>, embedder: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            store,
            embedder,
            builder: CardTextBuilder::new(),
        }
    }

    #[must_use]
    pub fn with_builder(mut self, builder: CardTextBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Rebuild and persist the embeddable text of one card, then embed it.
    /// The text is written before the provider is called, so a provider
    /// failure leaves the new text in place with no embedding.
    pub async fn refresh(&self, id: CardId) -> Result<Card> {
        let card = self.store.get(id).ok_or(Error::CardNotFound(id))?;
        let text = self.builder.build(&card)?;
        self.store.set_embeddable_text(id, text.clone())?;

        let embedding = self.embedder.vectorize(&text).await?;
        self.store.set_embedding(id, embedding)?;

        self.store.get(id).ok_or(Error::CardNotFound(id))
    }

    /// Refresh every card that has no embedding yet, in id order
    pub async fn refresh_missing(&self, options: &RefreshOptions) -> RefreshReport {
        let mut pending = self.store.missing_embeddings();
        let mut report = RefreshReport {
            pending: pending.len(),
            ..RefreshReport::default()
        };
        if let Some(max) = options.max_cards {
            pending.truncate(max);
        }
        if pending.is_empty() {
            return report;
        }

        tracing::info!(
            "Refreshing embeddings for {} card(s) with model {}",
            pending.len(),
            self.embedder.model()
        );
        let started = Instant::now();
        let total = pending.len();

        for (i, id) in pending.into_iter().enumerate() {
            match self.refresh(id).await {
                Ok(_) => report.refreshed += 1,
                Err(e) => {
                    tracing::warn!("Failed to refresh card {}: {}", id, e);
                    report.failed.push((id, e.to_string()));
                }
            }

            let done = i + 1;
            if options.progress_every > 0 && done % options.progress_every == 0 {
                tracing::info!("Refreshed {}/{} cards", done, total);
            }
            if let Some(pause) = options.pause {
                if done < total {
                    tokio::time::sleep(pause).await;
                }
            }
        }

        tracing::info!(
            "Embedding refresh finished in {:?}: {} refreshed, {} failed",
            started.elapsed(),
            report.refreshed,
            report.failed.len()
        );
        report
    }
}
