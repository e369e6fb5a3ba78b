use std::hint::black_box;
use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::prelude::*;

use fuzzcore::config::{default_edit_distance, default_smith_waterman};
use fuzzcore::FuzzyMatcher;

fn generate_candidates(count: usize, seed: u64) -> Vec<String> {
    let components = [
        "src", "lib", "core", "utils", "parser", "config", "handler", "service", "model", "view",
        "controller", "router", "middleware", "test", "bench",
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let depth = rng.random_range(1..=3);
            (0..depth)
                .map(|_| components[rng.random_range(0..components.len())])
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

fn bench_prepare(c: &mut Criterion) {
    let matcher = FuzzyMatcher::new(default_edit_distance());
    let mut group = c.benchmark_group("prepare");
    for query in ["src", "handlerConfig", "routerMiddleware/test"] {
        group.bench_function(query, |b| {
            b.iter(|| black_box(matcher.prepare(black_box(query))))
        });
    }
    group.finish();
}

fn bench_score_one(c: &mut Criterion) {
    let mut group = c.benchmark_group("score-one");

    let edit_matcher = FuzzyMatcher::new(default_edit_distance());
    let prepared = edit_matcher.prepare("hcfg");
    let mut buf = edit_matcher.make_buffer();
    group.bench_function("edit-distance", |b| {
        b.iter(|| edit_matcher.score(black_box(b"src/handler/config.rs"), &prepared, &mut buf))
    });

    let sw_matcher = FuzzyMatcher::new(default_smith_waterman());
    let prepared = sw_matcher.prepare("hcfg");
    let mut buf = sw_matcher.make_buffer();
    group.bench_function("smith-waterman", |b| {
        b.iter(|| sw_matcher.score(black_box(b"src/handler/config.rs"), &prepared, &mut buf))
    });

    group.finish();
}

fn bench_top_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("top-matches");

    for &count in &[1_000usize, 50_000, 200_000] {
        let candidates = generate_candidates(count, 7);

        let edit_matcher = FuzzyMatcher::new(default_edit_distance());
        group.bench_function(format!("edit-distance/{count}"), |b| {
            b.iter(|| black_box(edit_matcher.top_matches("hcfg", &candidates, 25)))
        });

        let sw_matcher = FuzzyMatcher::new(default_smith_waterman());
        group.bench_function(format!("smith-waterman/{count}"), |b| {
            b.iter(|| black_box(sw_matcher.top_matches("hcfg", &candidates, 25)))
        });
    }

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_top_matches_parallel(c: &mut Criterion) {
    let candidates = generate_candidates(200_000, 7);
    let matcher = FuzzyMatcher::new(default_edit_distance());

    let mut group = c.benchmark_group("top-matches-parallel/200000");
    for threads in [1usize, 2, 4, 8] {
        group.bench_function(format!("{threads}-threads"), |b| {
            b.iter(|| black_box(matcher.top_matches_parallel("hcfg", &candidates, 25, threads)))
        });
    }
    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_top_matches_parallel(_c: &mut Criterion) {}

fn criterion_benchmark(c: &mut Criterion) {
    bench_prepare(c);
    bench_score_one(c);
    bench_top_matches(c);
    bench_top_matches_parallel(c);
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(200))
        .measurement_time(Duration::from_secs(2));
    targets = criterion_benchmark
}
criterion_main!(benches);
