//! A single biased random walk.

use drunkard_core::{Cell, Direction, Probabilities, SimulationConfig};
use drunkard_space::{EdgeBehavior, Grid};

use crate::control::HaltReason;
use crate::counters::CellCounters;
use crate::error::EngineError;
use crate::rng::UnitSource;

/// How one walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Reached the center after `steps` steps.
    Absorbed {
        /// Steps taken.
        steps: u32,
    },
    /// Used the whole step budget without reaching the center.
    Exhausted,
    /// The start cell is an obstacle; nothing happened.
    Blocked,
    /// A poll point reported a halt.
    Halted(HaltReason),
}

/// Hooks the walk calls into at its poll points and position changes.
pub trait WalkObserver {
    /// Poll point before each step. Returning a reason ends the walk.
    fn checkpoint(&mut self) -> Option<HaltReason>;

    /// The walker is at `position` after `step` steps (0 for the start).
    fn position(&mut self, position: Cell, step: u32) -> Result<(), EngineError>;
}

/// Executes walks over one grid with fixed probabilities and budget.
#[derive(Clone, Debug)]
pub struct WalkEngine<'g> {
    grid: &'g Grid,
    edge: EdgeBehavior,
    probabilities: Probabilities,
    max_steps: u32,
}

impl<'g> WalkEngine<'g> {
    /// Engine for `grid` using the movement rules of `config`.
    ///
    /// Edges wrap when obstacles are disabled and block when they are
    /// enabled.
    pub fn new(grid: &'g Grid, config: &SimulationConfig) -> Self {
        Self {
            grid,
            edge: EdgeBehavior::for_mode(config.obstacles),
            probabilities: config.probabilities,
            max_steps: config.max_steps,
        }
    }

    /// Edge rule in use.
    pub fn edge(&self) -> EdgeBehavior {
        self.edge
    }

    /// Where a walker at `from` ends up for the draw `r`.
    ///
    /// A rejected move (off the edge with blocking edges, or onto an
    /// obstacle) returns `from`.
    pub fn step_from(&self, from: Cell, r: f64) -> Cell {
        let direction = Direction::select(r, &self.probabilities);
        self.grid.step(from, direction, self.edge)
    }

    /// Walk from `start` until absorption, budget exhaustion or a halt.
    ///
    /// An absorbed walk adds its step count to `start`'s counters. The
    /// caller counts the start itself. A step that lands on the center
    /// counts even when it is the last step of the budget.
    pub fn run<U, O>(
        &self,
        start: Cell,
        rng: &mut U,
        counters: &mut CellCounters,
        observer: &mut O,
    ) -> Result<WalkOutcome, EngineError>
    where
        U: UnitSource + ?Sized,
        O: WalkObserver + ?Sized,
    {
        if self.grid.is_obstacle(start) {
            return Ok(WalkOutcome::Blocked);
        }
        let mut position = start;
        let mut steps = 0u32;
        observer.position(position, steps)?;
        loop {
            if let Some(reason) = observer.checkpoint() {
                return Ok(WalkOutcome::Halted(reason));
            }
            if steps >= self.max_steps {
                return Ok(WalkOutcome::Exhausted);
            }
            position = self.step_from(position, rng.next_unit());
            steps += 1;
            if position.is_center() {
                counters.record_reach(start, steps);
                observer.position(position, steps)?;
                return Ok(WalkOutcome::Absorbed { steps });
            }
            observer.position(position, steps)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drunkard_core::{DisplayMode, ObstacleMode};

    struct Cycle(Vec<f64>, usize);

    impl UnitSource for Cycle {
        fn next_unit(&mut self) -> f64 {
            let r = self.0[self.1 % self.0.len()];
            self.1 += 1;
            r
        }
    }

    #[derive(Default)]
    struct Trace {
        positions: Vec<(Cell, u32)>,
        checkpoints: u32,
        halt_after: Option<u32>,
    }

    impl WalkObserver for Trace {
        fn checkpoint(&mut self) -> Option<HaltReason> {
            self.checkpoints += 1;
            match self.halt_after {
                Some(n) if self.checkpoints > n => Some(HaltReason::Stopped),
                _ => None,
            }
        }

        fn position(&mut self, position: Cell, step: u32) -> Result<(), EngineError> {
            self.positions.push((position, step));
            Ok(())
        }
    }

    fn config(rows: u32, cols: u32, k: u32, obstacles: ObstacleMode) -> SimulationConfig {
        SimulationConfig {
            rows,
            cols,
            replications: 1,
            max_steps: k,
            probabilities: Probabilities::uniform(),
            obstacles,
            obstacle_map: None,
            output: "out.csv".into(),
            initial_mode: DisplayMode::Interactive,
        }
    }

    #[test]
    fn wrapping_trajectory_reaches_center() {
        let grid = Grid::open(3, 3);
        let cfg = config(3, 3, 10, ObstacleMode::None);
        let engine = WalkEngine::new(&grid, &cfg);
        let mut counters = CellCounters::new(3, 3);
        let mut trace = Trace::default();
        let mut rng = Cycle(vec![0.1, 0.6], 0);
        let start = Cell::new(2, 0);
        let out = engine.run(start, &mut rng, &mut counters, &mut trace).unwrap();
        assert_eq!(out, WalkOutcome::Absorbed { steps: 5 });
        assert_eq!(
            trace.positions,
            vec![
                (Cell::new(2, 0), 0),
                (Cell::new(2, 2), 1),
                (Cell::new(1, 2), 2),
                (Cell::new(1, 1), 3),
                (Cell::new(0, 1), 4),
                (Cell::new(0, 0), 5),
            ]
        );
        assert_eq!(counters.reached(start), 1);
        assert_eq!(counters.total_steps(start), 5);
    }

    #[test]
    fn budget_exhaustion_records_nothing() {
        let grid = Grid::open(3, 3);
        let cfg = config(3, 3, 4, ObstacleMode::None);
        let engine = WalkEngine::new(&grid, &cfg);
        let mut counters = CellCounters::new(3, 3);
        let mut trace = Trace::default();
        // Always down: (1,1) -> (1,2) -> (1,0) -> (1,1) -> (1,2)
        let mut rng = Cycle(vec![0.3], 0);
        let start = Cell::new(1, 1);
        let out = engine.run(start, &mut rng, &mut counters, &mut trace).unwrap();
        assert_eq!(out, WalkOutcome::Exhausted);
        assert_eq!(trace.positions.len(), 5);
        assert_eq!(counters.reached(start), 0);
        assert_eq!(counters.total_steps(start), 0);
    }

    #[test]
    fn absorption_on_last_budgeted_step_counts() {
        let grid = Grid::open(1, 3);
        let cfg = config(1, 3, 1, ObstacleMode::None);
        let engine = WalkEngine::new(&grid, &cfg);
        let mut counters = CellCounters::new(1, 3);
        let mut rng = Cycle(vec![0.6], 0);
        let out = engine
            .run(Cell::new(1, 0), &mut rng, &mut counters, &mut Trace::default())
            .unwrap();
        assert_eq!(out, WalkOutcome::Absorbed { steps: 1 });
    }

    #[test]
    fn obstacle_start_is_a_no_op() {
        let grid = Grid::from_bitmap(2, 2, &[false, true, false, false]).unwrap();
        let cfg = config(2, 2, 10, ObstacleMode::Explicit);
        let engine = WalkEngine::new(&grid, &cfg);
        let mut counters = CellCounters::new(2, 2);
        let mut trace = Trace::default();
        let mut rng = Cycle(vec![0.5], 0);
        let out = engine
            .run(Cell::new(1, 0), &mut rng, &mut counters, &mut trace)
            .unwrap();
        assert_eq!(out, WalkOutcome::Blocked);
        assert!(trace.positions.is_empty());
        assert_eq!(rng.1, 0);
    }

    #[test]
    fn enclosed_cell_self_loops_until_budget() {
        // (2,2) is boxed in by the obstacles at (1,2) and (2,1).
        let mut map = vec![false; 9];
        map[Cell::new(1, 2).index(3)] = true;
        map[Cell::new(2, 1).index(3)] = true;
        let grid = Grid::from_bitmap(3, 3, &map).unwrap();
        let cfg = config(3, 3, 6, ObstacleMode::Explicit);
        let engine = WalkEngine::new(&grid, &cfg);
        let mut counters = CellCounters::new(3, 3);
        let mut trace = Trace::default();
        let mut rng = Cycle(vec![0.1, 0.3, 0.6, 0.9], 0);
        let start = Cell::new(2, 2);
        let out = engine.run(start, &mut rng, &mut counters, &mut trace).unwrap();
        assert_eq!(out, WalkOutcome::Exhausted);
        assert!(trace.positions.iter().all(|&(p, _)| p == start));
        assert_eq!(trace.positions.last(), Some(&(start, 6)));
    }

    #[test]
    fn halt_ends_the_walk_before_the_next_step() {
        let grid = Grid::open(5, 5);
        let cfg = config(5, 5, 100, ObstacleMode::None);
        let engine = WalkEngine::new(&grid, &cfg);
        let mut counters = CellCounters::new(5, 5);
        let mut trace = Trace {
            halt_after: Some(3),
            ..Trace::default()
        };
        let mut rng = Cycle(vec![0.3], 0);
        let out = engine
            .run(Cell::new(2, 2), &mut rng, &mut counters, &mut trace)
            .unwrap();
        assert_eq!(out, WalkOutcome::Halted(HaltReason::Stopped));
        assert_eq!(rng.1, 3);
        assert_eq!(trace.positions.len(), 4);
    }
}
