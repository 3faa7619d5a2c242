//! Per-run counters for logging and reporting.

/// Activity counters collected over one run.
///
/// Populated by the scheduler as the run progresses and returned in the
/// [`RunReport`](crate::RunReport).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Walk attempts begun, including no-op obstacle starts.
    pub walks_started: u64,
    /// Walks that reached the center.
    pub walks_absorbed: u64,
    /// Walks that used their whole step budget.
    pub walks_exhausted: u64,
    /// Walks whose start cell is an obstacle.
    pub walks_blocked: u64,
    /// Walks cut short by a halt.
    pub walks_halted: u64,
    /// Steps simulated across all walks.
    pub steps: u64,
    /// Position events delivered to the viewer.
    pub position_events: u64,
    /// Statistics chunks delivered to the viewer.
    pub stats_chunks: u64,
    /// Transitions into the paused state.
    pub pauses: u64,
    /// Wall-clock duration of the run, in microseconds.
    pub elapsed_us: u64,
}

impl RunMetrics {
    /// Walks that ended one way or another.
    pub fn walks_finished(&self) -> u64 {
        self.walks_absorbed + self.walks_exhausted + self.walks_blocked + self.walks_halted
    }
}
