// Snapshot persistence for the card store
use anyhow::{anyhow, Context, Result};
use atomicwrites::{AllowOverwrite, AtomicFile};
use magicsearch_core::{Card, CardStore};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_FILE: &str = "cards.snapshot";

/// Whole-store snapshot: every card, embeddings included, in insertion order
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Snapshot at `<data_dir>/cards.snapshot`
    pub fn in_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self::new(data_dir.as_ref().join(SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write every card of `store`. Returns the number of cards written.
    pub fn save(&self, store: &dyn CardStore) -> Result<usize> {
        let cards = store.cards();
        self.save_cards(&cards)?;
        Ok(cards.len())
    }

    pub fn save_cards(&self, cards: &[Card]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }

        let data = bincode::serialize(cards)
            .map_err(|e| anyhow!("Serialization error: {}", e))?;

        // temp file + rename, readers never see a torn snapshot
        AtomicFile::new(&self.path, AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| anyhow!("Failed to write snapshot {}: {}", self.path.display(), e))?;

        tracing::info!("Saved {} cards to {}", cards.len(), self.path.display());
        Ok(())
    }

    /// `Ok(None)` when no snapshot has been written yet
    pub fn load(&self) -> Result<Option<Vec<Card>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let cards: Vec<Card> = bincode::deserialize(&data)
            .map_err(|e| anyhow!("Deserialization error in {}: {}", self.path.display(), e))?;

        tracing::info!("Loaded {} cards from {}", cards.len(), self.path.display());
        Ok(Some(cards))
    }
}
