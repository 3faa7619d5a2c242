//! Cooperative pause / resume / mode / stop handling.
//!
//! Commands are never applied preemptively. The simulation calls
//! [`ControlChannel::checkpoint`] at its poll points (before each step,
//! after each walk) and the channel drains whatever has arrived. While
//! paused, the checkpoint blocks on the source until a resume or stop
//! arrives, so no step can advance.
//!
//! ```text
//!            Pause                      Stop / disconnect
//!  Running ─────────► Paused     (any) ───────────────────► Halted
//!     ▲                 │
//!     └─────────────────┘
//!            Resume
//! ```
//!
//! Display mode is an orthogonal axis toggled by `SwitchMode` in either
//! run state.

use crossbeam_channel::{Receiver, RecvError, TryRecvError};
use drunkard_core::{ControlCommand, DisplayMode};

// ── ControlSource ──────────────────────────────────────────────────

/// Result of asking a [`ControlSource`] for the next command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// A command arrived.
    Command(ControlCommand),
    /// Nothing pending right now.
    Idle,
    /// The peer is gone; no command will ever arrive.
    Disconnected,
}

/// Where inbound control commands come from.
pub trait ControlSource {
    /// Non-blocking check for the next command.
    fn try_next(&mut self) -> Poll;

    /// Block until a command arrives or the peer disconnects. Never
    /// returns [`Poll::Idle`].
    fn wait_next(&mut self) -> Poll;
}

/// Commands forwarded over a crossbeam channel, typically by the
/// transport reader thread. Dropping the sender reads as a disconnect.
#[derive(Debug)]
pub struct ChannelControl {
    rx: Receiver<ControlCommand>,
}

impl ChannelControl {
    /// Wrap the receiving end of a command channel.
    pub fn new(rx: Receiver<ControlCommand>) -> Self {
        Self { rx }
    }
}

impl ControlSource for ChannelControl {
    fn try_next(&mut self) -> Poll {
        match self.rx.try_recv() {
            Ok(cmd) => Poll::Command(cmd),
            Err(TryRecvError::Empty) => Poll::Idle,
            Err(TryRecvError::Disconnected) => Poll::Disconnected,
        }
    }

    fn wait_next(&mut self) -> Poll {
        match self.rx.recv() {
            Ok(cmd) => Poll::Command(cmd),
            Err(RecvError) => Poll::Disconnected,
        }
    }
}

impl<C: ControlSource + ?Sized> ControlSource for &mut C {
    fn try_next(&mut self) -> Poll {
        (**self).try_next()
    }

    fn wait_next(&mut self) -> Poll {
        (**self).wait_next()
    }
}

// ── ControlChannel ─────────────────────────────────────────────────

/// Whether steps may advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    /// Steps advance normally.
    Running,
    /// No step advances until a resume.
    Paused,
}

/// Why a run stopped before completing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaltReason {
    /// The viewer sent a stop command.
    Stopped,
    /// The viewer disconnected.
    PeerDisconnected,
}

/// Run-state × display-mode state machine with a terminal halt.
#[derive(Debug)]
pub struct ControlChannel<C: ControlSource> {
    source: C,
    run_state: RunState,
    mode: DisplayMode,
    halted: Option<HaltReason>,
    commands_applied: u64,
    pauses: u64,
}

impl<C: ControlSource> ControlChannel<C> {
    /// A running channel in `initial_mode`.
    pub fn new(source: C, initial_mode: DisplayMode) -> Self {
        Self {
            source,
            run_state: RunState::Running,
            mode: initial_mode,
            halted: None,
            commands_applied: 0,
            pauses: 0,
        }
    }

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Current run state.
    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Why the channel halted, if it has.
    pub fn halted(&self) -> Option<HaltReason> {
        self.halted
    }

    /// Commands applied so far.
    pub fn commands_applied(&self) -> u64 {
        self.commands_applied
    }

    /// Transitions into the paused state so far.
    pub fn pauses(&self) -> u64 {
        self.pauses
    }

    /// Enter the terminal halted state. The first reason wins.
    pub fn halt(&mut self, reason: HaltReason) {
        if self.halted.is_none() {
            tracing::debug!(?reason, "control halted");
            self.halted = Some(reason);
        }
    }

    /// Apply one command. Ignored once halted.
    pub fn apply(&mut self, cmd: ControlCommand) {
        if self.halted.is_some() {
            return;
        }
        self.commands_applied += 1;
        match cmd {
            ControlCommand::Pause => {
                if self.run_state == RunState::Running {
                    self.pauses += 1;
                }
                self.run_state = RunState::Paused;
            }
            ControlCommand::Resume => self.run_state = RunState::Running,
            ControlCommand::SwitchMode => self.mode = self.mode.toggled(),
            ControlCommand::Stop => self.halt(HaltReason::Stopped),
        }
        tracing::debug!(
            command = %cmd,
            state = ?self.run_state,
            mode = ?self.mode,
            "control command applied"
        );
    }

    /// Poll point: drain pending commands, then block while paused.
    ///
    /// Returns the halt reason once a stop or disconnect has been seen.
    pub fn checkpoint(&mut self) -> Option<HaltReason> {
        while self.halted.is_none() {
            match self.source.try_next() {
                Poll::Command(cmd) => self.apply(cmd),
                Poll::Idle => break,
                Poll::Disconnected => self.halt(HaltReason::PeerDisconnected),
            }
        }
        while self.halted.is_none() && self.run_state == RunState::Paused {
            match self.source.wait_next() {
                Poll::Command(cmd) => self.apply(cmd),
                Poll::Idle => {}
                Poll::Disconnected => self.halt(HaltReason::PeerDisconnected),
            }
        }
        self.halted
    }
}
