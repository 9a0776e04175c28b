// Performance benchmarks for the search path
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use magicsearch_core::{
    compile, AttributeSchema, Card, CardStore, Color, FilterSpec, InMemoryCardStore, Vector,
};
use magicsearch_text::{build_embeddable_text, normalize};
use rand::prelude::*;
use serde_json::json;

fn generate_random_vector(rng: &mut impl Rng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn generate_card(rng: &mut impl Rng, id: u64, dim: usize) -> Card {
    let mut card = Card::new(format!("card-{}", id), format!("Card {}", id)).with_id(id);
    card.card_type = Some(if id % 3 == 0 { "Instant" } else { "Creature" }.to_string());
    card.mana_value = Some((id % 8) as f64);
    card.colors = vec![Color::ALL[(id % 5) as usize]];
    card.keywords = if id % 4 == 0 { vec!["Flying".to_string()] } else { vec![] };
    card.with_embedding(generate_random_vector(rng, dim))
}

fn populated_store(size: u64, dim: usize) -> InMemoryCardStore {
    let mut rng = rand::rng();
    let store = InMemoryCardStore::default();
    for id in 1..=size {
        store.upsert(generate_card(&mut rng, id, dim)).unwrap();
    }
    store
}

fn benchmark_normalize(c: &mut Criterion) {
    let text = "{2}{W}{W}, {T}: Create a 1/1 white Spirit creature token with flying. \
                {W/U/P}: Untap target creature. Pay {15} life.";
    c.bench_function("normalize", |b| b.iter(|| normalize(black_box(text))));

    let mut card = Card::new("Fire // Ice", "Fire // Ice").with_id(1);
    card.card_type = Some("Instant".into());
    card.mana_cost = Some("{1}{R}".into());
    card.text = Some(text.to_string());
    card.colors = vec![Color::Red, Color::Blue];
    c.bench_function("build_embeddable_text", |b| {
        b.iter(|| build_embeddable_text(black_box(&card)).unwrap())
    });
}

fn benchmark_compile(c: &mut Criterion) {
    let schema = AttributeSchema::cards();
    let filters = FilterSpec::new()
        .with("colors", json!(["R", "G"]))
        .with("mana_value__lte", json!(3))
        .with("type", json!(["Instant", "Sorcery"]))
        .with("is_reserved", json!(false));
    c.bench_function("compile_filters", |b| {
        b.iter(|| compile(black_box(&filters), &schema).unwrap())
    });
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let dim = 256;
    let mut rng = rand::rng();
    let schema = AttributeSchema::cards();

    for size in [1_000u64, 10_000, 30_000].iter() {
        let store = populated_store(*size, dim);
        let query = generate_random_vector(&mut rng, dim);

        group.bench_with_input(BenchmarkId::new("unfiltered", size), size, |b, _| {
            b.iter(|| store.ranked(black_box(&query), &[], 0, 10).unwrap())
        });

        let filters = FilterSpec::new()
            .with("colors", json!(["R"]))
            .with("mana_value__lte", json!(3));
        let predicates = compile(&filters, &schema).unwrap();
        group.bench_with_input(BenchmarkId::new("filtered", size), size, |b, _| {
            b.iter(|| store.ranked(black_box(&query), &predicates, 0, 10).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_normalize, benchmark_compile, benchmark_search);
criterion_main!(benches);
