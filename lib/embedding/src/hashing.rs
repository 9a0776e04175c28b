//! Local hashing embedder
//!
//! Character trigrams and whole words are hashed into a fixed number of
//! buckets and the result is L2-normalized. Texts sharing vocabulary land
//! close together. No network and no model. Buckets come from SeaHash, whose
//! output is fixed across platforms and toolchains, so vectors saved in a
//! snapshot stay comparable with freshly embedded queries.

use crate::EmbeddingClient;
use async_trait::async_trait;
use magicsearch_core::{Error, Result, Vector};
use std::collections::HashSet;

pub const DEFAULT_HASHING_DIM: usize = 256;

#[derive(Debug, Clone)]
pub struct HashingEmbeddingClient {
    dim: usize,
    model: String,
}

impl HashingEmbeddingClient {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            model: format!("hashing-{dim}"),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Hash `text` into a normalized vector of `self.dim` buckets
    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        if self.dim == 0 {
            return vector;
        }
        let lowered = text.to_lowercase();

        for trigram in trigrams(&lowered) {
            vector[bucket(&trigram, self.dim)] += 1.0;
        }
        // whole words weigh more than fragments
        for word in lowered.split_whitespace() {
            vector[bucket(word, self.dim)] += 2.0;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for v in &mut vector {
                *v /= magnitude;
            }
        }
        vector
    }
}

impl Default for HashingEmbeddingClient {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIM)
    }
}

#[async_trait]
impl EmbeddingClient for HashingEmbeddingClient {
    async fn vectorize(&self, text: &str) -> Result<Vector> {
        if self.dim == 0 {
            return Err(Error::EmbeddingUnavailable(
                "hashing embedder configured with zero dimensions".to_string(),
            ));
        }
        Ok(Vector::new(self.embed(text)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn bucket(token: &str, dim: usize) -> usize {
    (seahash::hash(token.as_bytes()) % dim as u64) as usize
}

fn trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();
    chars.windows(3).map(|w| w.iter().collect::<String>()).collect()
}
