//! Core types for the drunkard random-walk simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: cell
//! coordinates, the simulation configuration and its validation, movement
//! directions, control commands, the wire-level message model, and the
//! configuration error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod config;
pub mod direction;
pub mod error;
pub mod id;
pub mod message;

pub use command::{ControlCommand, DisplayMode};
pub use config::{ObstacleMode, Probabilities, SimulationConfig, MAX_GRID_SIZE};
pub use direction::Direction;
pub use error::ConfigError;
pub use id::Cell;
pub use message::{CellStats, GameOver, Message, Outcome, StateUpdate, StatsUpdate};
