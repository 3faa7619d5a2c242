//! Messages exchanged between the viewer and the compute side.
//!
//! Every message is an envelope with a type discriminant and a payload
//! selected by that type. The binary encoding lives in `drunkard-wire`;
//! these types are the in-memory model only.

use std::fmt;

use crate::command::ControlCommand;
use crate::config::SimulationConfig;
use crate::id::Cell;

/// Live walker position, sent once per step in interactive mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateUpdate {
    /// Current walker position.
    pub position: Cell,
    /// Steps taken so far in this walk (0 for the starting position).
    pub step: u32,
    /// Zero-based replication index.
    pub replication: u32,
    /// Configured number of replications.
    pub total_replications: u32,
}

/// Derived statistics for one cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStats {
    /// The cell these values describe.
    pub cell: Cell,
    /// Mean recorded steps to absorption per walk started.
    pub avg_steps: f64,
    /// Fraction of started walks absorbed within the step budget.
    pub prob_reach: f64,
    /// Whether the cell is an obstacle.
    pub is_obstacle: bool,
}

/// One bounded chunk of a statistics sweep.
///
/// A full sweep is split into consecutive chunks sharing the same
/// progress counters. Receivers merge chunks by coordinate.
#[derive(Clone, Debug, PartialEq)]
pub struct StatsUpdate {
    /// Cells in this chunk, in row-major order.
    pub cells: Vec<CellStats>,
    /// Replications completed when the sweep was taken.
    pub replications_done: u32,
    /// Configured number of replications.
    pub replications_target: u32,
    /// The sweep is the final one of the run.
    pub final_update: bool,
    /// This chunk closes its sweep.
    pub last_chunk: bool,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every replication ran to completion.
    Completed,
    /// A stop command aborted the run.
    Stopped,
    /// The session failed (configuration, layout, or transport error).
    Failed,
}

impl Outcome {
    /// Whether the outcome is a failure.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Stopped => write!(f, "stopped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Terminal session message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOver {
    /// How the run ended.
    pub outcome: Outcome,
    /// Human-readable detail.
    pub message: String,
}

/// A protocol message.
///
/// # Examples
///
/// ```
/// use drunkard_core::{ControlCommand, Message};
///
/// let msg = Message::Control(ControlCommand::Pause);
/// assert_eq!(msg.kind(), "Control");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    /// Full configuration, viewer to compute, once at session start.
    Config(SimulationConfig),
    /// Request to load a configuration from a stored file. Reserved:
    /// the compute side rejects it.
    LoadConfig {
        /// Path of the stored results file.
        path: String,
    },
    /// Walker position, compute to viewer.
    StateUpdate(StateUpdate),
    /// Statistics chunk, compute to viewer.
    StatsUpdate(StatsUpdate),
    /// Control command, viewer to compute.
    Control(ControlCommand),
    /// Terminal message, compute to viewer.
    GameOver(GameOver),
    /// Free-form error text. Reserved.
    Error {
        /// Human-readable error.
        text: String,
    },
}

impl Message {
    /// Variant name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::LoadConfig { .. } => "LoadConfig",
            Self::StateUpdate(_) => "StateUpdate",
            Self::StatsUpdate(_) => "StatsUpdate",
            Self::Control(_) => "Control",
            Self::GameOver(_) => "GameOver",
            Self::Error { .. } => "Error",
        }
    }

    /// Whether this message ends the session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_game_over_is_terminal() {
        let over = Message::GameOver(GameOver {
            outcome: Outcome::Completed,
            message: "done".into(),
        });
        assert!(over.is_terminal());
        assert!(!Message::Control(ControlCommand::Stop).is_terminal());
        assert!(!Message::Error { text: "x".into() }.is_terminal());
    }

    #[test]
    fn only_failed_is_failure() {
        assert!(Outcome::Failed.is_failure());
        assert!(!Outcome::Stopped.is_failure());
        assert!(!Outcome::Completed.is_failure());
    }
}
