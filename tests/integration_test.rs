// Integration tests for MagicSearch
use magicsearch_core::{Card, CardStore, Color, Error, FilterSpec, InMemoryCardStore, Vector};
use magicsearch_embedding::{
    EmbeddingClient, EmbeddingConfig, HashingEmbeddingClient, HttpEmbeddingClient,
};
use magicsearch_engine::{Indexer, RefreshOptions, SearchConfig, SearchEngine, SearchQuery};
use magicsearch_storage::{load_dataset, restore_into, SnapshotStore};
use magicsearch_text::build_embeddable_text;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;

fn catalog() -> Vec<Card> {
    let mut bolt = Card::new("Bolt", "Bolt").with_id(1);
    bolt.card_type = Some("Instant".into());
    bolt.mana_cost = Some("{R}".into());
    bolt.mana_value = Some(1.0);
    bolt.colors = vec![Color::Red];
    bolt.text = Some("Deal 3 damage.".into());

    let mut growth = Card::new("Giant Growth", "Giant Growth").with_id(2);
    growth.card_type = Some("Instant".into());
    growth.mana_cost = Some("{G}".into());
    growth.mana_value = Some(1.0);
    growth.colors = vec![Color::Green];
    growth.text = Some("Target creature gets +3/+3 until end of turn.".into());

    let mut angel = Card::new("Serra Angel", "Serra Angel").with_id(3);
    angel.card_type = Some("Creature - Angel".into());
    angel.mana_cost = Some("{3}{W}{W}".into());
    angel.mana_value = Some(5.0);
    angel.colors = vec![Color::White];
    angel.power = Some("4".into());
    angel.toughness = Some("4".into());
    angel.keywords = vec!["Flying".into(), "Vigilance".into()];
    angel.text = Some("Flying, vigilance".into());

    let mut ornithopter = Card::new("Ornithopter", "Ornithopter").with_id(4);
    ornithopter.card_type = Some("Artifact Creature - Thopter".into());
    ornithopter.mana_cost = Some("{0}".into());
    ornithopter.mana_value = Some(0.0);
    ornithopter.keywords = vec!["Flying".into()];

    vec![bolt, growth, angel, ornithopter]
}

async fn indexed_engine() -> (Arc<InMemoryCardStore>, SearchEngine) {
    let store = Arc::new(InMemoryCardStore::default());
    restore_into(store.as_ref(), catalog()).unwrap();

    let embedder: Arc<dyn EmbeddingClient> = Arc::new(HashingEmbeddingClient::new(512));
    let report = Indexer::new(store.clone(), embedder.clone())
        .refresh_missing(&RefreshOptions::default())
        .await;
    assert!(report.is_complete());

    let engine = SearchEngine::new(store.clone(), embedder, SearchConfig::default());
    (store, engine)
}

#[tokio::test]
async fn test_bolt_end_to_end() {
    let (store, engine) = indexed_engine().await;

    let bolt = store.get(1).unwrap();
    let text = build_embeddable_text(&bolt).unwrap();
    assert!(text.contains("Card: Bolt"));
    assert!(text.contains("Type: Instant"));
    assert!(text.contains("Mana cost: red"));
    assert!(text.contains("Rules text: Deal 3 damage."));
    assert_eq!(bolt.text_to_embed.as_deref(), Some(text.as_str()));

    let result = engine.search(SearchQuery::text(text)).await.unwrap();
    assert_eq!(result.hits[0].card.name.as_deref(), Some("Bolt"));
    assert!(result.hits[0].distance.abs() < 1e-4);
    assert_eq!(result.len(), 4);
}

#[tokio::test]
async fn test_filters_compose_with_ranking() {
    let (_, engine) = indexed_engine().await;

    let filters = FilterSpec::new()
        .with("keywords", json!("Flying"))
        .with("mana_value__gte", json!(0))
        .with("mana_value__lt", json!(5));
    let result = engine
        .search(SearchQuery::text("flying creature").with_filters(filters))
        .await
        .unwrap();
    assert_eq!(result.ids(), vec![4]);

    let filters = FilterSpec::new()
        .with("colors", json!(["R", "G"]))
        .with("type", json!("Instant"));
    let result = engine
        .search(SearchQuery::text("instant").with_filters(filters))
        .await
        .unwrap();
    let mut ids = result.ids();
    ids.sort();
    assert_eq!(ids, vec![1, 2]);

    let filters = FilterSpec::new().with("mana_value", json!(0));
    let result = engine
        .search(SearchQuery::text("artifact").with_filters(filters))
        .await
        .unwrap();
    assert_eq!(result.ids(), vec![4]);
}

#[tokio::test]
async fn test_pagination_walks_the_ranking() {
    let (_, engine) = indexed_engine().await;
    let query = SearchQuery::text("instant damage");

    let full = engine.search(query.clone()).await.unwrap().ids();
    assert_eq!(full.len(), 4);

    let mut paged = Vec::new();
    for offset in 0..4 {
        let page = engine
            .search(query.clone().with_limit(1).with_offset(offset))
            .await
            .unwrap();
        paged.extend(page.ids());
    }
    assert_eq!(paged, full);
}

#[tokio::test]
async fn test_request_errors() {
    let (_, engine) = indexed_engine().await;

    let filters = FilterSpec::new().with("colour", json!("R")).with("flavor", json!("x"));
    match engine.search(SearchQuery::text("x").with_filters(filters)).await {
        Err(Error::UnknownAttribute(keys)) => assert_eq!(keys, vec!["colour", "flavor"]),
        other => panic!("expected UnknownAttribute, got {:?}", other),
    }

    let filters = FilterSpec::new().with("name__gte", json!("B"));
    assert!(matches!(
        engine.search(SearchQuery::text("x").with_filters(filters)).await,
        Err(Error::InvalidQuery(_))
    ));

    assert!(matches!(
        engine.search(SearchQuery::text("x").with_limit(0)).await,
        Err(Error::InvalidLimit(0))
    ));
}

#[tokio::test]
async fn test_text_change_invalidates_embedding() {
    let (store, engine) = indexed_engine().await;

    store
        .set_embeddable_text(1, "Card: Bolt. Rules text: Deal 4 damage.".into())
        .unwrap();
    assert_eq!(store.missing_embeddings(), vec![1]);

    let result = engine
        .search(SearchQuery::vector(Vector::new(vec![0.0; 512])))
        .await
        .unwrap();
    assert!(!result.ids().contains(&1));
}

#[test]
fn test_http_embedder_drives_search() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/api/embed")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "embeddings": [[1.0, 0.0]] }).to_string())
        .create();

    let store = Arc::new(InMemoryCardStore::default());
    store
        .upsert(Card::new("Bolt", "Bolt").with_id(1).with_embedding(Vector::new(vec![1.0, 0.0])))
        .unwrap();
    store
        .upsert(Card::new("Island", "Island").with_id(2).with_embedding(Vector::new(vec![0.0, 1.0])))
        .unwrap();

    let config = EmbeddingConfig::new(format!("{}/api/embed", server.url()));
    let embedder = Arc::new(HttpEmbeddingClient::new(config).unwrap());
    let engine = SearchEngine::new(store, embedder, SearchConfig::default());

    let result = tokio::runtime::Runtime::new()
        .unwrap()
        .block_on(engine.search(SearchQuery::text("burn spell")))
        .unwrap();
    assert_eq!(result.ids(), vec![1, 2]);
    assert_eq!(result.hits[0].distance, 0.0);
}

#[tokio::test]
async fn test_snapshot_restores_search_state() {
    let (store, engine) = indexed_engine().await;
    let before = engine.search(SearchQuery::text("flying")).await.unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let snapshot = SnapshotStore::in_dir(dir.path());
    assert_eq!(snapshot.save(store.as_ref()).unwrap(), 4);

    let restored = Arc::new(InMemoryCardStore::default());
    restore_into(restored.as_ref(), snapshot.load().unwrap().unwrap()).unwrap();
    assert!(restored.missing_embeddings().is_empty());

    let engine = SearchEngine::new(
        restored,
        Arc::new(HashingEmbeddingClient::new(512)),
        SearchConfig::default(),
    );
    let after = engine.search(SearchQuery::text("flying")).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_dataset_import() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{}",
        json!([
            { "card_key": "Bolt", "name": "Bolt", "type": "Instant", "mana_cost": "{R}", "colors": ["R"] },
            { "card_key": "Island", "name": "Island", "type": "Basic Land", "supertypes": ["Basic"] }
        ])
    )
    .unwrap();

    let store = Arc::new(InMemoryCardStore::default());
    restore_into(store.as_ref(), load_dataset(file.path()).unwrap()).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.missing_embeddings(), vec![1, 2]);

    let embedder = Arc::new(HashingEmbeddingClient::new(64));
    Indexer::new(store.clone(), embedder.clone())
        .refresh_missing(&RefreshOptions::default())
        .await;

    let engine = SearchEngine::new(store, embedder, SearchConfig::default());
    let filters = FilterSpec::new().with("supertypes", json!("Basic"));
    let result = engine
        .search(SearchQuery::text("land").with_filters(filters))
        .await
        .unwrap();
    assert_eq!(result.ids(), vec![2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_search_during_refresh() {
    let (store, engine) = indexed_engine().await;
    let engine = Arc::new(engine);
    let indexer = Indexer::new(store.clone(), Arc::new(HashingEmbeddingClient::new(512)));

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for round in 0..50 {
                // a changed text drops the embedding until the refresh writes a new one
                store
                    .set_embeddable_text(1, format!("Card: Bolt, draft {round}."))
                    .unwrap();
                indexer.refresh(1).await.unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = engine.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    let result = engine.search(SearchQuery::text("red instant")).await.unwrap();
                    let ids = result.ids();
                    assert!(ids.len() == 3 || ids.len() == 4, "got {:?}", ids);
                    assert!(ids.iter().all(|id| (1..=4).contains(id)));
                    assert!(result.hits.iter().all(|hit| hit.distance.is_finite()));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    assert!(store.missing_embeddings().is_empty());
    let result = engine.search(SearchQuery::text("red instant")).await.unwrap();
    assert_eq!(result.len(), 4);
}
