use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use magicsearch_api::RestApi;
use magicsearch_core::{CardStore, Distance, InMemoryCardStore, StoreConfig};
use magicsearch_embedding::{
    EmbeddingClient, EmbeddingConfig, HashingEmbeddingClient, HttpEmbeddingClient,
    DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
use magicsearch_engine::{Indexer, RefreshOptions, SearchConfig, SearchEngine};
use magicsearch_storage::{load_dataset, restore_into, SnapshotStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EmbedderKind {
    /// Remote Ollama-style embedding endpoint
    Http,
    /// Local feature hashing, no network
    Hashing,
}

/// Filtered semantic search over a trading-card catalog
#[derive(Parser, Debug)]
#[command(name = "magicsearch")]
#[command(about = "Filtered semantic search engine for trading cards", long_about = None)]
struct Args {
    /// Path to the data directory (holds the card snapshot)
    #[arg(short, long, env = "MAGICSEARCH_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// JSON card dataset to import when no snapshot exists
    #[arg(long, env = "MAGICSEARCH_CARDS")]
    cards: Option<PathBuf>,

    /// Import the dataset even if a snapshot exists
    #[arg(long)]
    reload: bool,

    /// HTTP API port
    #[arg(long, env = "MAGICSEARCH_HTTP_PORT", default_value_t = 8000)]
    http_port: u16,

    /// Embedding backend
    #[arg(long, value_enum, default_value_t = EmbedderKind::Http)]
    embedder: EmbedderKind,

    /// Embedding endpoint URL
    #[arg(long, env = "EMBEDDING_ENDPOINT_URL", default_value = DEFAULT_ENDPOINT)]
    embedding_endpoint: String,

    /// Bearer token for the embedding endpoint
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Embedding model identifier
    #[arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_MODEL)]
    embedding_model: String,

    /// Embedding request timeout in seconds
    #[arg(long, default_value_t = 30)]
    embedding_timeout: u64,

    /// L2-normalize embeddings returned by the endpoint
    #[arg(long)]
    normalize_embeddings: bool,

    /// Dimension of the hashing embedder
    #[arg(long, default_value_t = 256)]
    hashing_dim: usize,

    /// Enforce this embedding dimension (otherwise the first stored vector fixes it)
    #[arg(long)]
    vector_dim: Option<usize>,

    /// Distance metric: euclidean, cosine or dot
    #[arg(long, default_value = "euclidean")]
    distance: Distance,

    /// Largest page size a search may request
    #[arg(long, default_value_t = 300)]
    max_limit: usize,

    /// Embed every card still missing an embedding after startup
    #[arg(long)]
    embed_missing: bool,

    /// Pause between cards while embedding, in milliseconds
    #[arg(long, default_value_t = 0)]
    embed_pause_ms: u64,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn embedder(&self) -> anyhow::Result<Arc<dyn EmbeddingClient>> {
        Ok(match self.embedder {
            EmbedderKind::Http => {
                let config = EmbeddingConfig::new(&self.embedding_endpoint)
                    .with_api_key(self.api_key.clone())
                    .with_model(&self.embedding_model)
                    .with_timeout(Duration::from_secs(self.embedding_timeout))
                    .with_normalize(self.normalize_embeddings);
                Arc::new(HttpEmbeddingClient::new(config)?)
            }
            EmbedderKind::Hashing => Arc::new(HashingEmbeddingClient::new(self.hashing_dim)),
        })
    }

    fn refresh_options(&self) -> RefreshOptions {
        RefreshOptions {
            pause: (self.embed_pause_ms > 0).then(|| Duration::from_millis(self.embed_pause_ms)),
            ..RefreshOptions::default()
        }
    }
}

/// Restore from the snapshot, or import the dataset
fn load_cards(args: &Args, store: &dyn CardStore, snapshot: &SnapshotStore) -> anyhow::Result<()> {
    if !args.reload {
        if let Some(cards) = snapshot.load()? {
            let count = restore_into(store, cards)?;
            info!("Restored {} cards from snapshot", count);
            return Ok(());
        }
    }

    match &args.cards {
        Some(path) => {
            let count = restore_into(store, load_dataset(path)?)?;
            info!("Imported {} cards from {:?}", count, path);
        }
        None => warn!("No snapshot and no --cards dataset given; starting with an empty catalog"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {}", e))?;

    info!("Starting MagicSearch v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    let store = Arc::new(InMemoryCardStore::new(StoreConfig {
        vector_dim: args.vector_dim,
        distance: args.distance,
    }));
    let snapshot = SnapshotStore::in_dir(&args.data_dir);
    load_cards(&args, store.as_ref(), &snapshot)?;
    info!(
        "Catalog ready: {} cards, {} missing embeddings",
        store.len(),
        store.missing_embeddings().len()
    );

    let embedder = args.embedder()?;
    info!("Embedding model: {}", embedder.model());

    if args.embed_missing {
        let indexer = Indexer::new(store.clone(), embedder.clone());
        let options = args.refresh_options();
        let store_refresh = store.clone();
        let data_dir = args.data_dir.clone();
        tokio::spawn(async move {
            let report = indexer.refresh_missing(&options).await;
            if report.refreshed > 0 {
                if let Err(e) = SnapshotStore::in_dir(&data_dir).save(store_refresh.as_ref()) {
                    warn!("Failed to save snapshot after refresh: {}", e);
                }
            }
        });
    }

    let engine = Arc::new(SearchEngine::new(
        store.clone(),
        embedder,
        SearchConfig {
            max_limit: args.max_limit,
            ..SearchConfig::default()
        },
    ));

    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(engine, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("MagicSearch started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    snapshot.save(store.as_ref())?;
    Ok(())
}
