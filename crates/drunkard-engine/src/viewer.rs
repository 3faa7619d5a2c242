//! Viewer-side state built from inbound messages.
//!
//! Rendering and key handling live outside this crate. What lives here
//! is the model they draw from: the running statistics table merged from
//! chunks, the last walker position, progress, and the terminal message.

use drunkard_core::{Cell, CellStats, GameOver, Message, Outcome, StateUpdate, StatsUpdate};
use indexmap::IndexMap;

/// Statistics merged from chunks, keyed by coordinate.
///
/// Later chunks overwrite earlier values for the same cell; insertion
/// order follows first arrival, which is row-major for a single sweep.
#[derive(Clone, Debug, Default)]
pub struct StatsTable {
    cells: IndexMap<Cell, CellStats>,
    replications_done: u32,
    replications_target: u32,
    sweeps_completed: u64,
    final_seen: bool,
}

impl StatsTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one chunk.
    pub fn merge(&mut self, update: &StatsUpdate) {
        for stats in &update.cells {
            self.cells.insert(stats.cell, *stats);
        }
        self.replications_done = update.replications_done;
        self.replications_target = update.replications_target;
        if update.last_chunk {
            self.sweeps_completed += 1;
            if update.final_update {
                self.final_seen = true;
            }
        }
    }

    /// Latest values for `cell`.
    pub fn get(&self, cell: Cell) -> Option<&CellStats> {
        self.cells.get(&cell)
    }

    /// Cells known so far.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no chunk has arrived.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in first-arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &CellStats> {
        self.cells.values()
    }

    /// `(done, target)` replications from the latest chunk.
    pub fn progress(&self) -> (u32, u32) {
        (self.replications_done, self.replications_target)
    }

    /// Sweeps whose last chunk has arrived.
    pub fn sweeps_completed(&self) -> u64 {
        self.sweeps_completed
    }

    /// Whether the final sweep has fully arrived.
    pub fn is_final(&self) -> bool {
        self.final_seen
    }
}

/// Which statistic the grid view shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewKind {
    /// Mean steps to the center.
    #[default]
    AvgSteps,
    /// Probability of reaching the center within the budget.
    Probability,
}

impl ViewKind {
    /// The other view.
    pub fn toggled(self) -> Self {
        match self {
            Self::AvgSteps => Self::Probability,
            Self::Probability => Self::AvgSteps,
        }
    }

    /// The shown value of `stats`.
    pub fn value(self, stats: &CellStats) -> f64 {
        match self {
            Self::AvgSteps => stats.avg_steps,
            Self::Probability => stats.prob_reach,
        }
    }
}

/// Session lifecycle as the viewer sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for or receiving updates.
    Running,
    /// The terminal message arrived.
    Finished(GameOver),
}

/// Everything a viewer renders, updated one inbound message at a time.
#[derive(Clone, Debug)]
pub struct ViewerState {
    table: StatsTable,
    walker: Option<StateUpdate>,
    view: ViewKind,
    phase: Phase,
    errors: Vec<String>,
}

impl ViewerState {
    /// Fresh state, running, showing average steps.
    pub fn new() -> Self {
        Self {
            table: StatsTable::new(),
            walker: None,
            view: ViewKind::default(),
            phase: Phase::Running,
            errors: Vec::new(),
        }
    }

    /// Apply one inbound message. Returns `true` once the session is over.
    ///
    /// Messages after the terminal one are ignored.
    pub fn apply(&mut self, msg: &Message) -> bool {
        if self.is_finished() {
            return true;
        }
        match msg {
            Message::StateUpdate(update) => self.walker = Some(*update),
            Message::StatsUpdate(update) => self.table.merge(update),
            Message::GameOver(over) => self.phase = Phase::Finished(over.clone()),
            Message::Error { text } => self.errors.push(text.clone()),
            other => tracing::debug!(kind = other.kind(), "viewer ignores message"),
        }
        self.is_finished()
    }

    /// The peer vanished without a terminal message.
    pub fn disconnected(&mut self) {
        if !self.is_finished() {
            self.phase = Phase::Finished(GameOver {
                outcome: Outcome::Failed,
                message: "Connection lost.".into(),
            });
        }
    }

    /// Flip between average steps and probability.
    pub fn toggle_view(&mut self) {
        self.view = self.view.toggled();
    }

    /// Current view.
    pub fn view(&self) -> ViewKind {
        self.view
    }

    /// Merged statistics.
    pub fn table(&self) -> &StatsTable {
        &self.table
    }

    /// Last reported walker position.
    pub fn walker(&self) -> Option<&StateUpdate> {
        self.walker.as_ref()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the session is over.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    /// Error texts received.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(x: u32, y: u32, avg: f64) -> CellStats {
        CellStats {
            cell: Cell::new(x, y),
            avg_steps: avg,
            prob_reach: 0.5,
            is_obstacle: false,
        }
    }

    fn chunk(cells: Vec<CellStats>, done: u32, final_update: bool, last: bool) -> StatsUpdate {
        StatsUpdate {
            cells,
            replications_done: done,
            replications_target: 10,
            final_update,
            last_chunk: last,
        }
    }

    #[test]
    fn chunks_merge_by_coordinate() {
        let mut table = StatsTable::new();
        table.merge(&chunk(vec![stats(0, 0, 0.0), stats(1, 0, 2.0)], 1, false, false));
        table.merge(&chunk(vec![stats(0, 1, 3.0)], 1, false, true));
        table.merge(&chunk(vec![stats(1, 0, 4.0)], 2, false, false));
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(Cell::new(1, 0)).unwrap().avg_steps, 4.0);
        assert_eq!(table.progress(), (2, 10));
        assert_eq!(table.sweeps_completed(), 1);
        assert!(!table.is_final());
        let order: Vec<Cell> = table.iter().map(|s| s.cell).collect();
        assert_eq!(order, vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(0, 1)]);
    }

    #[test]
    fn final_sweep_needs_its_last_chunk() {
        let mut table = StatsTable::new();
        table.merge(&chunk(vec![stats(1, 0, 1.0)], 10, true, false));
        assert!(!table.is_final());
        table.merge(&chunk(vec![stats(0, 1, 1.0)], 10, true, true));
        assert!(table.is_final());
    }

    #[test]
    fn terminal_message_freezes_state() {
        let mut view = ViewerState::new();
        let pos = StateUpdate {
            position: Cell::new(2, 1),
            step: 4,
            replication: 0,
            total_replications: 3,
        };
        assert!(!view.apply(&Message::StateUpdate(pos)));
        let over = GameOver {
            outcome: Outcome::Stopped,
            message: "stopped".into(),
        };
        assert!(view.apply(&Message::GameOver(over.clone())));
        let later = StateUpdate { step: 5, ..pos };
        assert!(view.apply(&Message::StateUpdate(later)));
        assert_eq!(view.walker(), Some(&pos));
        assert_eq!(view.phase(), &Phase::Finished(over));
    }

    #[test]
    fn view_toggle_switches_values() {
        let mut view = ViewerState::new();
        let s = stats(1, 1, 7.0);
        assert_eq!(view.view().value(&s), 7.0);
        view.toggle_view();
        assert_eq!(view.view().value(&s), 0.5);
        view.toggle_view();
        assert_eq!(view.view(), ViewKind::AvgSteps);
    }

    #[test]
    fn disconnect_without_game_over_fails() {
        let mut view = ViewerState::new();
        view.disconnected();
        assert!(matches!(
            view.phase(),
            Phase::Finished(GameOver {
                outcome: Outcome::Failed,
                ..
            })
        ));
    }
}
