//! # Segue Performance Benchmarks
//!
//! Benchmarks for the hot paths of the recommendation core.
//!
//! ## Benchmark Categories
//!
//! - **Shortest Path**: Dijkstra between distant items
//! - **Ingestion**: Replaying play sessions into the graph
//! - **Recommendations**: Similar items and auto-play lists
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench shortest_path
//! ```

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use segue::{Catalog, ItemKey, Recommender};
use std::hint::black_box;

fn key(i: usize) -> ItemKey {
    ItemKey::new(format!("item{i:05}"))
}

/// Sessions that walk a ring of `count` items with periodic cross-links.
fn create_sessions(count: usize) -> Vec<Vec<ItemKey>> {
    (0..count)
        .step_by(10)
        .map(|start| {
            let mut session: Vec<ItemKey> = (start..start + 12).map(|i| key(i % count)).collect();
            session.push(key((start * 7) % count));
            session
        })
        .collect()
}

/// Helper function to create a catalog with realistic play history
fn create_benchmark_catalog(count: usize) -> Catalog {
    let mut catalog = Catalog::new("/music");
    for i in 0..count {
        catalog
            .add_item(key(i), &format!("Artist{}/Song{i:05}.mp3", i / 50))
            .expect("Failed to add item");
    }
    for session in create_sessions(count) {
        catalog.ingest_play_sequence(&session);
    }
    catalog
}

fn benchmark_shortest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");

    for size in [100, 500, 1000] {
        let catalog = create_benchmark_catalog(size);
        let (from, to) = (key(0), key(size / 2));
        group.bench_with_input(BenchmarkId::new("distance", size), &catalog, |b, catalog| {
            b.iter(|| catalog.distance(black_box(&from), black_box(&to)))
        });
    }

    group.finish();
}

fn benchmark_ingestion(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingestion");

    let sessions = create_sessions(1000);
    group.bench_function("replay_sessions", |b| {
        b.iter_batched(
            || {
                let mut catalog = Catalog::new("/music");
                for i in 0..1000 {
                    let _ = catalog.add_item(key(i), &format!("Song{i:05}.mp3"));
                }
                catalog
            },
            |mut catalog| {
                for session in &sessions {
                    catalog.ingest_play_sequence(black_box(session));
                }
                catalog
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn benchmark_recommendations(c: &mut Criterion) {
    let mut group = c.benchmark_group("recommendations");
    group.sample_size(20);

    for size in [50, 200] {
        let catalog = create_benchmark_catalog(size);
        let engine = Recommender::new(&catalog);
        let subject = key(0);

        group.bench_with_input(BenchmarkId::new("similar_items", size), &engine, |b, engine| {
            b.iter(|| engine.similar_items(black_box(&subject), 25))
        });
        group.bench_with_input(BenchmarkId::new("auto_play", size), &engine, |b, engine| {
            b.iter(|| engine.auto_play(black_box(10)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_shortest_path,
    benchmark_ingestion,
    benchmark_recommendations
);
criterion_main!(benches);
