//! Error types for writing and reloading result files.

use std::error::Error;
use std::fmt;
use std::io;

use drunkard_core::ConfigError;
use drunkard_space::LayoutError;

/// Errors arising from result persistence or layout reload.
#[derive(Debug)]
pub enum ResultsError {
    /// An I/O error on the results file.
    Io(io::Error),
    /// The file has no `# Params:` line.
    MissingParams,
    /// The `# Params:` line could not be parsed.
    MalformedParams {
        /// What was wrong.
        detail: String,
    },
    /// The `# Map:` block is incomplete or contains something other than
    /// `0`/`1` cells.
    MalformedMap {
        /// What was wrong.
        detail: String,
    },
    /// The stats table does not cover the grid.
    TableSize {
        /// Cells in the grid.
        expected: usize,
        /// Rows supplied.
        got: usize,
    },
    /// The reloaded parameters do not form a valid configuration.
    Config(ConfigError),
    /// The reloaded map does not form a valid grid.
    Layout(LayoutError),
}

impl fmt::Display for ResultsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingParams => write!(f, "no parameter line found"),
            Self::MalformedParams { detail } => write!(f, "malformed parameter line: {detail}"),
            Self::MalformedMap { detail } => write!(f, "malformed obstacle map: {detail}"),
            Self::TableSize { expected, got } => {
                write!(f, "stats table has {got} cells, grid has {expected}")
            }
            Self::Config(e) => write!(f, "reloaded config: {e}"),
            Self::Layout(e) => write!(f, "reloaded layout: {e}"),
        }
    }
}

impl Error for ResultsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Layout(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ResultsError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ConfigError> for ResultsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<LayoutError> for ResultsError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}
