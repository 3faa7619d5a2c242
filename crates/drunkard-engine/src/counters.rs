//! Per-cell aggregate counters.

use drunkard_core::Cell;

/// Started, total-steps and reached counts for every cell of a grid,
/// indexed row-major.
///
/// Counters only grow during a run. The center's entries stay zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellCounters {
    cols: u32,
    started: Vec<u64>,
    total_steps: Vec<u64>,
    reached: Vec<u64>,
}

impl CellCounters {
    /// Zeroed counters for a `rows × cols` grid.
    pub fn new(rows: u32, cols: u32) -> Self {
        let n = rows as usize * cols as usize;
        Self {
            cols,
            started: vec![0; n],
            total_steps: vec![0; n],
            reached: vec![0; n],
        }
    }

    /// Count a walk attempt from `cell`, including no-op obstacle starts.
    pub fn record_start(&mut self, cell: Cell) {
        self.started[cell.index(self.cols)] += 1;
    }

    /// Record that a walk from `start` reached the center after `steps`.
    pub fn record_reach(&mut self, start: Cell, steps: u32) {
        let i = start.index(self.cols);
        self.total_steps[i] += u64::from(steps);
        self.reached[i] += 1;
    }

    /// Walks started from `cell`.
    pub fn started(&self, cell: Cell) -> u64 {
        self.started[cell.index(self.cols)]
    }

    /// Sum of steps over absorbed walks from `cell`.
    pub fn total_steps(&self, cell: Cell) -> u64 {
        self.total_steps[cell.index(self.cols)]
    }

    /// Absorbed walks from `cell`.
    pub fn reached(&self, cell: Cell) -> u64 {
        self.reached[cell.index(self.cols)]
    }

    /// Number of cells tracked.
    pub fn len(&self) -> usize {
        self.started.len()
    }

    /// Whether no cells are tracked.
    pub fn is_empty(&self) -> bool {
        self.started.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate_per_cell() {
        let mut c = CellCounters::new(2, 3);
        let a = Cell::new(2, 1);
        c.record_start(a);
        c.record_start(a);
        c.record_reach(a, 7);
        assert_eq!(c.started(a), 2);
        assert_eq!(c.reached(a), 1);
        assert_eq!(c.total_steps(a), 7);
        assert_eq!(c.started(Cell::new(1, 1)), 0);
        assert_eq!(c.len(), 6);
    }
}
