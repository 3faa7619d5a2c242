//! Simulation configuration and validation.
//!
//! [`SimulationConfig`] is delivered once by the setup collaborator and is
//! immutable for the lifetime of a run. [`validate()`](SimulationConfig::validate)
//! must succeed before any grid or counter storage is allocated.

use crate::command::DisplayMode;
use crate::direction::Direction;
use crate::error::ConfigError;

/// Largest supported number of rows or columns.
pub const MAX_GRID_SIZE: u32 = 100;

// ── Probabilities ──────────────────────────────────────────────────

/// Per-direction movement probabilities.
///
/// The four values are not required to sum to one. Selection is by
/// cumulative threshold over up, down and left; right takes whatever
/// is left (see [`Direction::select`]).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probabilities {
    /// Probability of moving up.
    pub up: f64,
    /// Probability of moving down.
    pub down: f64,
    /// Probability of moving left.
    pub left: f64,
    /// Probability of moving right.
    pub right: f64,
}

impl Probabilities {
    /// All four directions equally likely.
    pub fn uniform() -> Self {
        Self {
            up: 0.25,
            down: 0.25,
            left: 0.25,
            right: 0.25,
        }
    }

    /// Value for a single direction.
    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Sum of all four values.
    pub fn total(&self) -> f64 {
        self.up + self.down + self.left + self.right
    }
}

impl Default for Probabilities {
    fn default() -> Self {
        Self::uniform()
    }
}

// ── ObstacleMode ───────────────────────────────────────────────────

/// How the obstacle map is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObstacleMode {
    /// No obstacles. The grid wraps on both axes.
    #[default]
    None,
    /// A random, fully connected layout with one obstacle per five cells.
    Random,
    /// A caller-supplied bitmap, copied verbatim.
    Explicit,
}

impl ObstacleMode {
    /// Whether obstacles (and therefore blocking edges) are in effect.
    pub fn enabled(self) -> bool {
        !matches!(self, Self::None)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete description of one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Grid height.
    pub rows: u32,
    /// Grid width.
    pub cols: u32,
    /// Number of replications (full passes over all start cells).
    pub replications: u32,
    /// Step budget `K` for a single walk.
    pub max_steps: u32,
    /// Movement probabilities.
    pub probabilities: Probabilities,
    /// Obstacle layout mode.
    pub obstacles: ObstacleMode,
    /// Row-major obstacle bitmap. Required for, and only allowed with,
    /// [`ObstacleMode::Explicit`].
    pub obstacle_map: Option<Vec<bool>>,
    /// Where the final results table is written.
    pub output: String,
    /// Display mode at session start.
    pub initial_mode: DisplayMode,
}

impl SimulationConfig {
    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Check every structural invariant.
    ///
    /// Pure; allocates nothing proportional to the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows > MAX_GRID_SIZE || self.cols > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
                max: MAX_GRID_SIZE,
            });
        }
        if self.replications == 0 {
            return Err(ConfigError::ZeroReplications);
        }
        if self.max_steps == 0 {
            return Err(ConfigError::ZeroStepBudget);
        }
        for direction in Direction::ALL {
            let value = self.probabilities.get(direction);
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { direction, value });
            }
        }
        match (self.obstacles, &self.obstacle_map) {
            (ObstacleMode::Explicit, None) => return Err(ConfigError::MissingObstacleMap),
            (ObstacleMode::Explicit, Some(map)) => {
                if map.len() != self.cell_count() {
                    return Err(ConfigError::ObstacleMapSize {
                        expected: self.cell_count(),
                        got: map.len(),
                    });
                }
                if map[0] {
                    return Err(ConfigError::CenterBlocked);
                }
            }
            (ObstacleMode::None | ObstacleMode::Random, Some(_)) => {
                return Err(ConfigError::UnexpectedObstacleMap {
                    mode: self.obstacles,
                });
            }
            (ObstacleMode::None | ObstacleMode::Random, None) => {}
        }
        if self.output.trim().is_empty() {
            return Err(ConfigError::MissingOutput);
        }
        Ok(())
    }
}
