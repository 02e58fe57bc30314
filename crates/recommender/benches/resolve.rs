//! Benchmarks for title resolution
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic 2000-movie table so no artifacts are needed.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_loader::{Catalog, CatalogEntry, MovieId, SimilarityTable, Store};
use recommender::Resolver;
use std::sync::Arc;

const MOVIES: MovieId = 2000;

fn build_resolver() -> Resolver {
    let ids: Vec<MovieId> = (1..=MOVIES).collect();

    let mut catalog = Catalog::new();
    for &movie_id in &ids {
        catalog
            .insert(CatalogEntry {
                movie_id,
                title: format!("Movie {}", movie_id),
            })
            .expect("ids are unique");
    }

    let scores = ids
        .iter()
        .flat_map(|&row| ids.iter().map(move |&col| ((row * 31 + col * 17) % 1000) as f64 / 1000.0))
        .collect();
    let table = SimilarityTable::new(ids.clone(), ids, scores).expect("square table");

    Resolver::new(Arc::new(Store::new(catalog, table)))
}

fn bench_resolve_hit(c: &mut Criterion) {
    let resolver = build_resolver();

    c.bench_function("resolve_exact_top10", |b| {
        b.iter(|| {
            let recs = resolver.resolve(black_box("Movie 1000"), black_box(10));
            black_box(recs)
        })
    });
}

fn bench_resolve_miss(c: &mut Criterion) {
    let resolver = build_resolver();

    c.bench_function("resolve_suggestions", |b| {
        b.iter(|| {
            let recs = resolver.resolve(black_box("movie 19"), black_box(10));
            black_box(recs)
        })
    });
}

criterion_group!(benches, bench_resolve_hit, bench_resolve_miss);
criterion_main!(benches);
