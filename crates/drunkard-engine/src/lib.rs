//! Simulation runtime for the drunkard random walk.
//!
//! The compute side of a session receives one [`SimulationConfig`], builds
//! the grid, and runs every replication of every start cell through the
//! [`WalkEngine`]. Control commands arrive between steps through a
//! [`ControlSource`]; position events and statistics leave through an
//! [`Outbound`] sink. When the run ends the results are persisted, a
//! final statistics sweep is sent, and a single
//! [`GameOver`](drunkard_core::GameOver) closes the session.
//!
//! The simulation is single-threaded. The only other thread is the
//! transport reader spawned by [`serve_tcp`], which forwards decoded
//! control commands over a channel.
//!
//! [`SimulationConfig`]: drunkard_core::SimulationConfig

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod control;
pub mod counters;
pub mod error;
pub mod metrics;
pub mod rng;
pub mod scheduler;
pub mod session;
pub mod sink;
pub mod stats;
pub mod viewer;
pub mod walk;

pub use config::EngineConfig;
pub use control::{ChannelControl, ControlChannel, ControlSource, HaltReason, Poll, RunState};
pub use counters::CellCounters;
pub use error::EngineError;
pub use metrics::RunMetrics;
pub use rng::{seeded_rng, UnitSource};
pub use scheduler::{ReplicationScheduler, RunReport};
pub use session::{handshake, run_session, serve_tcp, spawn_control_reader};
pub use sink::Outbound;
pub use stats::{chunk_sweep, sweep};
pub use viewer::{Phase, StatsTable, ViewKind, ViewerState};
pub use walk::{WalkEngine, WalkObserver, WalkOutcome};
