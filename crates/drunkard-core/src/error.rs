//! Configuration errors.
//!
//! Every variant is detected by [`SimulationConfig::validate`](crate::SimulationConfig::validate)
//! before a grid is allocated or a walk is started.

use std::error::Error;
use std::fmt;

use crate::config::ObstacleMode;
use crate::direction::Direction;

/// Errors detected while validating a [`SimulationConfig`](crate::SimulationConfig).
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Rows or columns is zero.
    EmptyGrid {
        /// Configured rows.
        rows: u32,
        /// Configured columns.
        cols: u32,
    },
    /// Rows or columns exceeds the supported maximum.
    GridTooLarge {
        /// Configured rows.
        rows: u32,
        /// Configured columns.
        cols: u32,
        /// The supported maximum per axis.
        max: u32,
    },
    /// Replication count is zero.
    ZeroReplications,
    /// Step budget `K` is zero.
    ZeroStepBudget,
    /// A movement probability is NaN, infinite, or outside `[0, 1]`.
    InvalidProbability {
        /// The offending direction.
        direction: Direction,
        /// The rejected value.
        value: f64,
    },
    /// Explicit obstacle mode without a bitmap.
    MissingObstacleMap,
    /// The explicit bitmap does not cover the grid exactly.
    ObstacleMapSize {
        /// `rows * cols`.
        expected: usize,
        /// Bitmap length.
        got: usize,
    },
    /// The explicit bitmap marks the center as an obstacle.
    CenterBlocked,
    /// A bitmap was supplied for a mode that generates its own layout.
    UnexpectedObstacleMap {
        /// The configured mode.
        mode: ObstacleMode,
    },
    /// No output target was given.
    MissingOutput,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid { rows, cols } => {
                write!(f, "grid must have at least one row and column, got {rows}x{cols}")
            }
            Self::GridTooLarge { rows, cols, max } => {
                write!(f, "grid {rows}x{cols} exceeds the maximum of {max}x{max}")
            }
            Self::ZeroReplications => write!(f, "replication count must be at least 1"),
            Self::ZeroStepBudget => write!(f, "step budget K must be at least 1"),
            Self::InvalidProbability { direction, value } => {
                write!(f, "probability for {direction:?} must be in [0, 1], got {value}")
            }
            Self::MissingObstacleMap => {
                write!(f, "explicit obstacle mode requires an obstacle map")
            }
            Self::ObstacleMapSize { expected, got } => {
                write!(f, "obstacle map has {got} cells, expected {expected}")
            }
            Self::CenterBlocked => write!(f, "the center cell cannot be an obstacle"),
            Self::UnexpectedObstacleMap { mode } => {
                write!(f, "obstacle map supplied for {mode:?} mode")
            }
            Self::MissingOutput => write!(f, "output target is empty"),
        }
    }
}

impl Error for ConfigError {}
