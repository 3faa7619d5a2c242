//! Persisted result tables for the drunkard simulator.
//!
//! A results file is CSV with one row per cell. It may be preceded by a
//! comment block recording the run parameters and the exact obstacle map,
//! which [`load_layout`] reads back so a layout can be rerun.
//!
//! ```text
//! # Params: R=3, C=3, K=10, Prob=0.25/0.25/0.25/0.25, Obstacles=explicit
//! # Map:
//! # 0 0 0
//! # 0 0 1
//! # 0 1 0
//! X,Y,AvgSteps,ProbReachK
//! 0,0,0.00,0.00
//! 1,0,3.50,1.00
//! ...
//! ```
//!
//! RNG state is never written.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod layout;
pub mod table;

pub use error::ResultsError;
pub use layout::{load_layout, load_layout_file, SavedLayout};
pub use table::{persist, write_results};

/// Column header line of every results file.
pub const CSV_HEADER: &str = "X,Y,AvgSteps,ProbReachK";

const PARAMS_PREFIX: &str = "# Params:";
const MAP_PREFIX: &str = "# Map:";
