//! Test utilities for drunkard development.
//!
//! Scripted stand-ins for the engine's collaborators: a random source
//! that replays fixed draws, a control source that delivers commands at
//! chosen poll points, and an outbound sink that records every message.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::VecDeque;
use std::io;

use drunkard_core::{ControlCommand, Message, StatsUpdate};
use drunkard_engine::{ControlSource, Outbound, Poll, UnitSource};
use drunkard_wire::WireError;

// ── ScriptedSource ─────────────────────────────────────────────────

/// Replays a fixed list of draws, cycling when it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(draws: impl Into<Vec<f64>>) -> Self {
        let draws = draws.into();
        assert!(!draws.is_empty(), "a scripted source needs at least one draw");
        Self { draws, next: 0 }
    }

    /// Draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl UnitSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let r = self.draws[self.next % self.draws.len()];
        self.next += 1;
        r
    }
}

// ── ScriptedControl ────────────────────────────────────────────────

/// Delivers each command once a given number of idle polls has passed.
///
/// Every poll point ends with exactly one idle answer, so "after `n`
/// idle polls" means "at the `n + 1`-th poll point". Blocking waits take
/// the next scripted command immediately and report a disconnect when
/// the script is empty.
#[derive(Clone, Debug, Default)]
pub struct ScriptedControl {
    script: VecDeque<(u64, ControlCommand)>,
    idle_polls: u64,
}

impl ScriptedControl {
    /// A source that never sends anything.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Deliver `cmd` after `idle_polls` idle answers. Entries must be
    /// added in non-decreasing order.
    pub fn then(mut self, idle_polls: u64, cmd: ControlCommand) -> Self {
        self.script.push_back((idle_polls, cmd));
        self
    }

    /// Idle answers given so far.
    pub fn idle_polls(&self) -> u64 {
        self.idle_polls
    }
}

impl ControlSource for ScriptedControl {
    fn try_next(&mut self) -> Poll {
        match self.script.front() {
            Some(&(at, cmd)) if at <= self.idle_polls => {
                self.script.pop_front();
                Poll::Command(cmd)
            }
            _ => {
                self.idle_polls += 1;
                Poll::Idle
            }
        }
    }

    fn wait_next(&mut self) -> Poll {
        match self.script.pop_front() {
            Some((_, cmd)) => Poll::Command(cmd),
            None => Poll::Disconnected,
        }
    }
}

// ── RecordingSink ──────────────────────────────────────────────────

/// Records every outbound message. Can be told to fail after a number
/// of sends to simulate a viewer that vanishes.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub messages: Vec<Message>,
    fail_after: Option<(usize, io::ErrorKind)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` messages, then fail every send with a broken pipe.
    pub fn failing_after(n: usize) -> Self {
        Self::failing_after_with(n, io::ErrorKind::BrokenPipe)
    }

    /// Accept `n` messages, then fail every send with `kind`.
    pub fn failing_after_with(n: usize, kind: io::ErrorKind) -> Self {
        Self {
            messages: Vec::new(),
            fail_after: Some((n, kind)),
        }
    }

    /// Recorded position events as `(x, y, step)`.
    pub fn positions(&self) -> Vec<(u32, u32, u32)> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::StateUpdate(s) => Some((s.position.x, s.position.y, s.step)),
                _ => None,
            })
            .collect()
    }

    /// Recorded statistics chunks.
    pub fn stats(&self) -> Vec<&StatsUpdate> {
        self.messages
            .iter()
            .filter_map(|m| match m {
                Message::StatsUpdate(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Number of terminal messages recorded.
    pub fn terminal_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_terminal()).count()
    }
}

impl Outbound for RecordingSink {
    fn send(&mut self, msg: &Message) -> Result<(), WireError> {
        if let Some((n, kind)) = self.fail_after {
            if self.messages.len() >= n {
                return Err(WireError::Io(io::Error::from(kind)));
            }
        }
        self.messages.push(msg.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_source_cycles() {
        let mut s = ScriptedSource::new([0.6, 0.1]);
        assert_eq!(s.next_unit(), 0.6);
        assert_eq!(s.next_unit(), 0.1);
        assert_eq!(s.next_unit(), 0.6);
        assert_eq!(s.consumed(), 3);
    }

    #[test]
    fn scripted_control_waits_for_its_poll() {
        let mut c = ScriptedControl::silent().then(2, ControlCommand::Pause);
        assert_eq!(c.try_next(), Poll::Idle);
        assert_eq!(c.try_next(), Poll::Idle);
        assert_eq!(c.try_next(), Poll::Command(ControlCommand::Pause));
        assert_eq!(c.wait_next(), Poll::Disconnected);
    }

    #[test]
    fn recording_sink_can_fail() {
        let mut sink = RecordingSink::failing_after(1);
        let msg = Message::Error { text: "x".into() };
        assert!(sink.send(&msg).is_ok());
        assert!(sink.send(&msg).unwrap_err().is_disconnect());
        assert_eq!(sink.messages.len(), 1);
    }

    #[test]
    fn recording_sink_can_fail_without_disconnecting() {
        let mut sink = RecordingSink::failing_after_with(0, io::ErrorKind::TimedOut);
        let err = sink.send(&Message::Error { text: "x".into() }).unwrap_err();
        assert!(!err.is_disconnect());
        assert!(sink.messages.is_empty());
    }
}
