//! Benchmarks for border-graph queries.
//!
//! Route creation samples up to a hundred frontiers, so BFS speed bounds
//! how quickly a new route appears.

#![allow(missing_docs)]

use std::collections::HashSet;
use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use geodash::{CountryCode, Region, World};

fn bench_shortest_path(c: &mut Criterion) {
    let world = World::embedded().expect("embedded dataset");
    let graph = world.graph();
    let pt = CountryCode::from_static("PT");
    let cn = CountryCode::from_static("CN");
    let blocked: HashSet<CountryCode> = ["DE", "FR"].into_iter().map(CountryCode::from_static).collect();

    c.bench_function("shortest_path_pt_cn", |b| {
        b.iter(|| black_box(graph.shortest_path(black_box(pt), black_box(cn), None)));
    });

    c.bench_function("shortest_path_pt_cn_excluding", |b| {
        b.iter(|| black_box(graph.shortest_path(black_box(pt), black_box(cn), Some(&blocked))));
    });
}

fn bench_frontier(c: &mut Criterion) {
    let world = World::embedded().expect("embedded dataset");
    let de = CountryCode::from_static("DE");

    c.bench_function("countries_at_distance_4", |b| {
        b.iter(|| black_box(world.countries_at_distance(black_box(de), 4, Region::All)));
    });
}

fn bench_load(c: &mut Criterion) {
    c.bench_function("world_embedded", |b| {
        b.iter(|| black_box(World::embedded()));
    });
}

criterion_group!(benches, bench_shortest_path, bench_frontier, bench_load);
criterion_main!(benches);
