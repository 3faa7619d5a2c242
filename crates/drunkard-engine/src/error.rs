//! Session-level error type.

use std::error::Error;
use std::fmt;

use drunkard_core::ConfigError;
use drunkard_results::ResultsError;
use drunkard_space::LayoutError;
use drunkard_wire::WireError;

/// Errors that end a session.
///
/// Configuration errors are rejected before anything is allocated;
/// transport and generation errors are fatal once the run has begun.
#[derive(Debug)]
pub enum EngineError {
    /// The simulation configuration failed validation.
    Config(ConfigError),
    /// The process-local engine configuration is invalid.
    InvalidEngineConfig {
        /// Which setting was rejected.
        reason: String,
    },
    /// The grid could not be built.
    Layout(LayoutError),
    /// The transport failed.
    Wire(WireError),
    /// The results file could not be written.
    Results(ResultsError),
    /// The peer did not open the session with a configuration.
    Handshake {
        /// What arrived instead.
        detail: String,
    },
    /// The peer asked for something the compute side does not handle.
    UnsupportedRequest {
        /// Message kind of the request.
        kind: &'static str,
    },
    /// The transport reader thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::InvalidEngineConfig { reason } => write!(f, "invalid engine config: {reason}"),
            Self::Layout(e) => write!(f, "layout: {e}"),
            Self::Wire(e) => write!(f, "transport: {e}"),
            Self::Results(e) => write!(f, "results: {e}"),
            Self::Handshake { detail } => write!(f, "handshake failed: {detail}"),
            Self::UnsupportedRequest { kind } => write!(f, "unsupported request {kind}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Layout(e) => Some(e),
            Self::Wire(e) => Some(e),
            Self::Results(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<LayoutError> for EngineError {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::Config(c) => Self::Config(c),
            other => Self::Layout(other),
        }
    }
}

impl From<WireError> for EngineError {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

impl From<ResultsError> for EngineError {
    fn from(e: ResultsError) -> Self {
        Self::Results(e)
    }
}
