//! Criterion micro-benchmarks for walk execution.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use drunkard_bench::{obstacle_config, reference_config, reference_grid};
use drunkard_core::Cell;
use drunkard_engine::{CellCounters, EngineError, HaltReason, WalkEngine, WalkObserver};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Observer that never halts and discards positions.
struct Discard;

impl WalkObserver for Discard {
    fn checkpoint(&mut self) -> Option<HaltReason> {
        None
    }

    fn position(&mut self, position: Cell, step: u32) -> Result<(), EngineError> {
        black_box((position, step));
        Ok(())
    }
}

/// Benchmark: 100 walks from the far corner of an open 100×100 torus.
fn bench_walks_open(c: &mut Criterion) {
    let config = reference_config(1);
    let grid = reference_grid(&config, 1).unwrap();
    let engine = WalkEngine::new(&grid, &config);
    let start = Cell::new(99, 99);

    c.bench_function("walks_open_100", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        b.iter(|| {
            let mut counters = CellCounters::new(grid.rows(), grid.cols());
            for _ in 0..100 {
                let out = engine.run(start, &mut rng, &mut counters, &mut Discard).unwrap();
                black_box(out);
            }
        });
    });
}

/// Benchmark: one walk from every cell of a 100×100 grid with obstacles.
fn bench_sweep_obstacles(c: &mut Criterion) {
    let config = obstacle_config(1);
    let grid = reference_grid(&config, 3).unwrap();
    let engine = WalkEngine::new(&grid, &config);

    c.bench_function("sweep_obstacles_10k", |b| {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        b.iter(|| {
            let mut counters = CellCounters::new(grid.rows(), grid.cols());
            for cell in grid.start_cells() {
                counters.record_start(cell);
                let out = engine.run(cell, &mut rng, &mut counters, &mut Discard).unwrap();
                black_box(out);
            }
        });
    });
}

criterion_group!(benches, bench_walks_open, bench_sweep_obstacles);
criterion_main!(benches);
