//! Grid topology and obstacle layouts for the drunkard simulator.
//!
//! - [`Grid`]: a rows × cols lattice with a per-cell obstacle flag and the
//!   absorbing center at `(0, 0)`.
//! - [`EdgeBehavior`]: what a move off the edge of the grid does.
//! - [`layout`]: builds the obstacle map for a configuration and checks
//!   that every free cell can reach the center.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod grid;
pub mod layout;

pub use edge::EdgeBehavior;
pub use error::LayoutError;
pub use grid::Grid;
pub use layout::{build_layout, is_fully_connected, random_layout};
