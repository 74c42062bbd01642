//! Benchmarks for the per-keystroke search pipeline.
//!
//! Simulates realistic catalogue sizes:
//! - small:  ~200 listings  (single agency)
//! - medium: ~2000 listings (city-wide marketplace)
//! - large:  ~8000 listings (regional marketplace)
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use samsar::behavior::SearchBehavior;
use samsar::engine::SearchEngine;
use samsar::remote::{RecommendationBoosts, SemanticScores};
use samsar::score::ScoreInputs;
use samsar::types::{AmenityKey, Filters, Listing, TransactionKind};

const CATALOGUE_SIZES: &[(&str, usize)] = &[("small", 200), ("medium", 2_000), ("large", 8_000)];

const DISTRICTS: &[(&str, &str)] = &[
    ("Canastel", "Bir El Djir"),
    ("Akid Lotfi", "Bir El Djir"),
    ("USTO", "Bir El Djir"),
    ("Maraval", "Oran"),
    ("Hai Es Salem", "Oran"),
    ("Les Castors", "Oran"),
];

const CATEGORIES: &[&str] = &["Appartement", "Villa", "Duplex", "Studio", "Terrain"];

fn synthetic_listings(count: usize) -> Vec<Listing> {
    (0..count)
        .map(|i| {
            let (district, commune) = DISTRICTS[i % DISTRICTS.len()];
            let category = CATEGORIES[i % CATEGORIES.len()];
            let beds = (i % 5) as u32 + 1;
            let amenities = AmenityKey::ALL
                .iter()
                .skip(i % 7)
                .step_by(3)
                .take(4)
                .copied()
                .collect();
            Listing {
                id: i as u64,
                ref_code: format!("ORN-{i:05}"),
                title: format!("{category} {district} réf {i}"),
                transaction_kind: if i % 4 == 0 {
                    TransactionKind::RentMonthly
                } else {
                    TransactionKind::Sale
                },
                location_type: None,
                category: Some(category.to_string()),
                description: Some(format!("Bien situé à {district}, proche commodités")),
                price: format!("{} 000 000", 2 + i % 12),
                location: format!("{district}, {commune}"),
                beds,
                baths: 1 + (i % 2) as u32,
                area: 60.0 + (i % 200) as f64,
                created_at: Some(1_756_000_000_000 - (i as i64 % 60) * 86_400_000),
                images: vec![String::from("photo.jpg"); i % 8],
                amenities: Some(amenities),
            }
        })
        .collect()
}

fn build_engine(count: usize) -> SearchEngine {
    SearchEngine::new(
        synthetic_listings(count),
        vec!["Oran".into(), "Bir El Djir".into(), "Es Senia".into()],
        DISTRICTS
            .iter()
            .map(|(d, c)| (d.to_string(), c.to_string()))
            .collect(),
    )
}

fn bench_search(c: &mut Criterion) {
    let behavior = SearchBehavior::default();
    let semantic = SemanticScores::default();
    let recommendations = RecommendationBoosts::default();
    let inputs = ScoreInputs {
        now_ms: 1_756_000_000_000,
        behavior: &behavior,
        semantic: &semantic,
        recommendations: &recommendations,
    };

    let mut group = c.benchmark_group("search");
    for (name, count) in CATALOGUE_SIZES {
        let engine = build_engine(*count);
        let filters = engine
            .parse_query("appartement f3 canastel vue mer", &Filters::default())
            .filters;
        group.bench_with_input(BenchmarkId::new("query", name), &engine, |b, engine| {
            b.iter(|| black_box(engine.search(black_box(&filters), &inputs)));
        });
    }
    group.finish();
}

fn bench_suggestions(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggestions");
    for (name, count) in CATALOGUE_SIZES {
        let engine = build_engine(*count);
        group.bench_with_input(BenchmarkId::new("keystroke", name), &engine, |b, engine| {
            b.iter(|| black_box(engine.suggestions(black_box("cana"), &Filters::default())));
        });
    }
    group.finish();
}

fn bench_intent(c: &mut Criterion) {
    let engine = build_engine(2_000);
    c.bench_function("intent/extract", |b| {
        b.iter(|| {
            black_box(engine.parse_query(
                black_box("location f3 meublé max 80 000 bir el djir sans vis-à-vis"),
                &Filters::default(),
            ))
        });
    });
}

criterion_group!(benches, bench_search, bench_suggestions, bench_intent);
criterion_main!(benches);
