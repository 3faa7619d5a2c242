//! Viewer control commands and the display mode they toggle.

use std::fmt;

/// A control command issued by the viewer.
///
/// Commands are transient: they are never stored, only applied at the
/// next poll point of the running simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlCommand {
    /// Suspend stepping until a resume (or stop) arrives.
    Pause,
    /// Continue stepping after a pause.
    Resume,
    /// Toggle between [`DisplayMode::Interactive`] and [`DisplayMode::Summary`].
    SwitchMode,
    /// Abort the run. Terminal.
    Stop,
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pause => write!(f, "pause"),
            Self::Resume => write!(f, "resume"),
            Self::SwitchMode => write!(f, "switch-mode"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// How much detail the compute side streams to the viewer.
///
/// Governs only whether per-step position events are produced; switching
/// never touches accumulated counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// One position event per simulated step.
    #[default]
    Interactive,
    /// Periodic statistics snapshots only.
    Summary,
}

impl DisplayMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Interactive => Self::Summary,
            Self::Summary => Self::Interactive,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => write!(f, "interactive"),
            Self::Summary => write!(f, "summary"),
        }
    }
}
