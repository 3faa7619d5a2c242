//! Drunkard: a Monte-Carlo estimator of how long a biased random walker
//! takes to reach the center of a grid.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the drunkard sub-crates. For most users, adding `drunkard` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use drunkard::prelude::*;
//! use drunkard::engine::Poll;
//! use drunkard::wire::MessageWriter;
//!
//! // No viewer is attached: nothing ever pauses or stops the run.
//! struct Unattended;
//! impl ControlSource for Unattended {
//!     fn try_next(&mut self) -> Poll { Poll::Idle }
//!     fn wait_next(&mut self) -> Poll { Poll::Disconnected }
//! }
//!
//! let output = std::env::temp_dir().join("drunkard-quickstart.csv");
//! let config = SimulationConfig {
//!     rows: 5,
//!     cols: 5,
//!     replications: 3,
//!     max_steps: 50,
//!     probabilities: Probabilities::uniform(),
//!     obstacles: ObstacleMode::None,
//!     obstacle_map: None,
//!     output: output.display().to_string(),
//!     initial_mode: DisplayMode::Summary,
//! };
//!
//! let sink = MessageWriter::new(Vec::new());
//! let report = run_session(config, &EngineConfig::unpaced(7), Unattended, sink).unwrap();
//! assert_eq!(report.outcome, Outcome::Completed);
//! assert_eq!(report.counters.started(Cell::new(4, 4)), 3);
//! # let _ = std::fs::remove_file(output);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `drunkard-core` | Cells, configuration, commands, messages |
//! | [`space`] | `drunkard-space` | Grid, edge rules, obstacle layouts |
//! | [`wire`] | `drunkard-wire` | Framed binary protocol |
//! | [`results`] | `drunkard-results` | Results table and layout reload |
//! | [`engine`] | `drunkard-engine` | Walks, scheduler, sessions, viewer state |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`drunkard-core`).
///
/// Cells, the simulation configuration and its validation, directions,
/// control commands and the message model.
pub use drunkard_core as types;

/// Grid and obstacle layouts (`drunkard-space`).
///
/// [`space::Grid`] with its edge rules, plus [`space::build_layout`] for
/// open, explicit and random connected layouts.
pub use drunkard_space as space;

/// Framed binary protocol (`drunkard-wire`).
///
/// [`wire::MessageWriter`] and [`wire::MessageReader`] over any byte
/// stream, with [`wire::FrameAssembler`] for partial reads.
pub use drunkard_wire as wire;

/// Results table and layout reload (`drunkard-results`).
pub use drunkard_results as results;

/// Walks, replication scheduling, sessions and viewer state (`drunkard-engine`).
///
/// [`engine::run_session`] drives one run over any control source and
/// outbound sink; [`engine::serve_tcp`] does the same for a TCP viewer.
pub use drunkard_engine as engine;

/// Common imports for typical drunkard usage.
///
/// ```rust
/// use drunkard::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use drunkard_core::{
        Cell, CellStats, ControlCommand, DisplayMode, GameOver, Message, ObstacleMode, Outcome,
        Probabilities, SimulationConfig,
    };

    // Errors
    pub use drunkard_core::ConfigError;
    pub use drunkard_engine::EngineError;
    pub use drunkard_results::ResultsError;
    pub use drunkard_space::LayoutError;
    pub use drunkard_wire::WireError;

    // Space
    pub use drunkard_space::{EdgeBehavior, Grid};

    // Results
    pub use drunkard_results::{load_layout_file, SavedLayout};

    // Engine
    pub use drunkard_engine::{
        run_session, serve_tcp, ControlSource, EngineConfig, Outbound, RunReport, ViewerState,
    };
}
