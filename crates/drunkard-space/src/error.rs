//! Error types for grid construction and layout generation.

use std::error::Error;
use std::fmt;

use drunkard_core::ConfigError;

/// Errors arising from building a grid or generating its obstacle layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// A bitmap does not match the grid dimensions.
    MapSize {
        /// `rows * cols`.
        expected: usize,
        /// Bitmap length.
        got: usize,
    },
    /// A bitmap marks the center as an obstacle.
    CenterBlocked,
    /// Random generation produced no fully connected layout within the cap.
    NotConverged {
        /// Number of layouts generated and rejected.
        attempts: u32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::MapSize { expected, got } => {
                write!(f, "obstacle map has {got} cells, expected {expected}")
            }
            Self::CenterBlocked => write!(f, "the center cell cannot be an obstacle"),
            Self::NotConverged { attempts } => {
                write!(f, "no fully connected layout found after {attempts} attempts")
            }
        }
    }
}

impl Error for LayoutError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for LayoutError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}
