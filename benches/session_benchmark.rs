//! Benchmarks for session creation and full simulated games.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use geodash::game::{BorderBlitzState, FlagSprintState, RouteState};
use geodash::sim::{SimConfig, play, run_batch};
use geodash::{Difficulty, GameKind, Region, Rng, World};

fn bench_create(c: &mut Criterion) {
    let world = World::embedded().expect("embedded dataset");

    c.bench_function("route_create_hard", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let state = RouteState::create(&world, Difficulty::Hard, Region::All, &mut Rng::new(seed));
            black_box(state)
        });
    });

    c.bench_function("flags_create_medium", |b| {
        let mut rng = Rng::new(7);
        b.iter(|| black_box(FlagSprintState::create(&world, Difficulty::Medium, Region::All, &mut rng)));
    });

    c.bench_function("border_blitz_create_hard", |b| {
        let mut rng = Rng::new(7);
        b.iter(|| black_box(BorderBlitzState::create(&world, Difficulty::Hard, Region::All, &mut rng)));
    });
}

fn bench_simulated_games(c: &mut Criterion) {
    let world = World::embedded().expect("embedded dataset");
    let config = SimConfig::default();

    for kind in GameKind::ALL {
        c.bench_function(&format!("simulate_{}", kind.name()), |b| {
            b.iter(|| black_box(play(kind, black_box(42), &world, &config)));
        });
    }

    c.bench_function("simulate_batch_60", |b| {
        b.iter(|| black_box(run_batch(&world, 60, black_box(1), None, &config)));
    });
}

criterion_group!(benches, bench_create, bench_simulated_games);
criterion_main!(benches);
