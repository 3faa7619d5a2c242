//! Derived per-cell statistics and their chunked delivery.

use drunkard_core::{CellStats, StatsUpdate};
use drunkard_space::Grid;

use crate::counters::CellCounters;

/// Mean steps and reach probability from raw counts. Both are zero for
/// a cell with no started walks.
///
/// The mean is taken over started walks, so a cell whose walks rarely
/// arrive shows a small average.
pub fn derive(started: u64, total_steps: u64, reached: u64) -> (f64, f64) {
    if started == 0 {
        return (0.0, 0.0);
    }
    let n = started as f64;
    (total_steps as f64 / n, reached as f64 / n)
}

/// Statistics for every cell of `grid` in row-major order, center
/// included.
pub fn sweep(grid: &Grid, counters: &CellCounters) -> Vec<CellStats> {
    grid.cells()
        .map(|cell| {
            let (avg_steps, prob_reach) = derive(
                counters.started(cell),
                counters.total_steps(cell),
                counters.reached(cell),
            );
            CellStats {
                cell,
                avg_steps,
                prob_reach,
                is_obstacle: grid.is_obstacle(cell),
            }
        })
        .collect()
}

/// Split a sweep into chunks of at most `chunk_size` cells.
///
/// Every chunk carries the same progress counters and `final_update`
/// flag; only the last has `last_chunk` set. An empty sweep still yields
/// one (empty) chunk so the receiver sees the sweep close.
pub fn chunk_sweep(
    cells: &[CellStats],
    chunk_size: usize,
    replications_done: u32,
    replications_target: u32,
    final_update: bool,
) -> Vec<StatsUpdate> {
    let chunk_size = chunk_size.max(1);
    if cells.is_empty() {
        return vec![StatsUpdate {
            cells: Vec::new(),
            replications_done,
            replications_target,
            final_update,
            last_chunk: true,
        }];
    }
    let count = cells.len().div_ceil(chunk_size);
    cells
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, chunk)| StatsUpdate {
            cells: chunk.to_vec(),
            replications_done,
            replications_target,
            final_update,
            last_chunk: i + 1 == count,
        })
        .collect()
}
