//! Criterion micro-benchmarks for the wire codec.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use drunkard_bench::{reference_config, reference_grid};
use drunkard_core::Message;
use drunkard_engine::{chunk_sweep, sweep, CellCounters};
use drunkard_wire::{decode_message, encode_frame, FrameAssembler};

/// Benchmark: encode a full 10K-cell sweep as 50-cell chunks.
fn bench_encode_sweep(c: &mut Criterion) {
    let config = reference_config(1);
    let grid = reference_grid(&config, 1).unwrap();
    let cells = sweep(&grid, &CellCounters::new(grid.rows(), grid.cols()));
    let chunks: Vec<Message> = chunk_sweep(&cells, 50, 1, 1, true)
        .into_iter()
        .map(Message::StatsUpdate)
        .collect();

    c.bench_function("encode_sweep_10k", |b| {
        b.iter(|| {
            for msg in &chunks {
                black_box(encode_frame(msg).unwrap());
            }
        });
    });
}

/// Benchmark: reassemble and decode the same sweep from 1 KiB reads.
fn bench_decode_sweep(c: &mut Criterion) {
    let config = reference_config(1);
    let grid = reference_grid(&config, 1).unwrap();
    let cells = sweep(&grid, &CellCounters::new(grid.rows(), grid.cols()));
    let bytes: Vec<u8> = chunk_sweep(&cells, 50, 1, 1, true)
        .into_iter()
        .flat_map(|u| encode_frame(&Message::StatsUpdate(u)).unwrap())
        .collect();

    c.bench_function("decode_sweep_10k", |b| {
        b.iter(|| {
            let mut asm = FrameAssembler::new();
            for read in bytes.chunks(1024) {
                asm.push(read);
                while let Some(frame) = asm.next_frame().unwrap() {
                    black_box(decode_message(&frame).unwrap());
                }
            }
        });
    });
}

criterion_group!(benches, bench_encode_sweep, bench_decode_sweep);
criterion_main!(benches);
