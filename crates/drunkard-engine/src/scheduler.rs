//! Replication scheduling, periodic statistics and run completion.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use drunkard_core::{
    Cell, DisplayMode, GameOver, Message, Outcome, SimulationConfig, StateUpdate,
};
use drunkard_results::{ResultsError, SavedLayout};
use drunkard_space::Grid;

use crate::config::EngineConfig;
use crate::control::{ControlChannel, ControlSource, HaltReason};
use crate::counters::CellCounters;
use crate::error::EngineError;
use crate::metrics::RunMetrics;
use crate::rng::UnitSource;
use crate::sink::Outbound;
use crate::stats::{chunk_sweep, sweep};
use crate::walk::{WalkEngine, WalkObserver, WalkOutcome};

// ── RunReport ──────────────────────────────────────────────────────

/// Everything known about a run once its terminal message has been sent.
#[derive(Debug)]
pub struct RunReport {
    /// Terminal status sent to the viewer.
    pub outcome: Outcome,
    /// Why the run stopped early, if it did.
    pub halt: Option<HaltReason>,
    /// Replications fully completed.
    pub replications_done: u32,
    /// Final per-cell counters.
    pub counters: CellCounters,
    /// Activity counters.
    pub metrics: RunMetrics,
    /// Seed of the session RNG, when the session chose it.
    pub seed: Option<u64>,
    /// Set when the results file could not be written.
    pub persist_error: Option<ResultsError>,
}

// ── Walk hooks ─────────────────────────────────────────────────────

/// Connects a walk to the control channel, the outbound sink and the
/// metrics of the running scheduler.
struct Hooks<'s, C: ControlSource, O: Outbound> {
    control: &'s mut ControlChannel<C>,
    sink: &'s mut O,
    metrics: &'s mut RunMetrics,
    replication: u32,
    total_replications: u32,
    step_delay: Duration,
}

impl<C: ControlSource, O: Outbound> WalkObserver for Hooks<'_, C, O> {
    fn checkpoint(&mut self) -> Option<HaltReason> {
        self.control.checkpoint()
    }

    fn position(&mut self, position: Cell, step: u32) -> Result<(), EngineError> {
        if step > 0 {
            self.metrics.steps += 1;
        }
        if self.control.mode() != DisplayMode::Interactive || self.control.halted().is_some() {
            return Ok(());
        }
        let msg = Message::StateUpdate(StateUpdate {
            position,
            step,
            replication: self.replication,
            total_replications: self.total_replications,
        });
        if deliver(&mut *self.sink, &mut *self.control, &msg)? {
            self.metrics.position_events += 1;
            if !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }
        }
        Ok(())
    }
}

/// Send `msg`, halting the channel if the peer is gone.
///
/// Returns whether the message was delivered. Transport failures other
/// than a disconnect are errors.
fn deliver<C: ControlSource, O: Outbound + ?Sized>(
    sink: &mut O,
    control: &mut ControlChannel<C>,
    msg: &Message,
) -> Result<bool, EngineError> {
    if control.halted() == Some(HaltReason::PeerDisconnected) {
        return Ok(false);
    }
    match sink.send(msg) {
        Ok(()) => Ok(true),
        Err(e) if e.is_disconnect() => {
            tracing::warn!(error = %e, kind = msg.kind(), "viewer disconnected");
            control.halt(HaltReason::PeerDisconnected);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

// ── ReplicationScheduler ───────────────────────────────────────────

/// Drives the walk engine over every start cell for every replication
/// and owns the run's counters.
///
/// Cells are visited in row-major order, skipping the center. A start
/// is counted before its walk runs, so every non-center cell has been
/// started exactly `replications` times after a complete run.
pub struct ReplicationScheduler<'a, U, C, O>
where
    U: UnitSource,
    C: ControlSource,
    O: Outbound,
{
    config: &'a SimulationConfig,
    engine: &'a EngineConfig,
    grid: &'a Grid,
    rng: U,
    control: ControlChannel<C>,
    sink: O,
    counters: CellCounters,
    metrics: RunMetrics,
    replications_done: u32,
}

impl<'a, U, C, O> ReplicationScheduler<'a, U, C, O>
where
    U: UnitSource,
    C: ControlSource,
    O: Outbound,
{
    /// Scheduler over a validated configuration and its built grid.
    pub fn new(
        config: &'a SimulationConfig,
        engine: &'a EngineConfig,
        grid: &'a Grid,
        rng: U,
        control: C,
        sink: O,
    ) -> Self {
        Self {
            config,
            engine,
            grid,
            rng,
            control: ControlChannel::new(control, config.initial_mode),
            sink,
            counters: CellCounters::new(grid.rows(), grid.cols()),
            metrics: RunMetrics::default(),
            replications_done: 0,
        }
    }

    /// Run to completion or halt, then persist, send the final sweep and
    /// the terminal message.
    ///
    /// A stop or a vanished viewer is not an error; it shows up in the
    /// report's outcome. Errors mean no terminal message was sent. A
    /// transport failure mid-run still persists the partial counters
    /// before the error is returned.
    pub fn run(mut self) -> Result<RunReport, EngineError> {
        let started = Instant::now();
        let simulated = self.simulate();
        self.metrics.elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.metrics.pauses = self.control.pauses();
        match simulated {
            Ok((halt, done)) => self.finish(halt, done),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    replications = self.replications_done,
                    "transport failed, saving partial results"
                );
                if let Err(pe) = self.persist() {
                    tracing::warn!(error = %pe, output = %self.config.output, "results not saved");
                }
                Err(e)
            }
        }
    }

    fn simulate(&mut self) -> Result<(Option<HaltReason>, u32), EngineError> {
        let grid = self.grid;
        let walker = WalkEngine::new(grid, self.config);
        let total = self.config.replications;
        for rep in 0..total {
            let _span = tracing::debug_span!("replication", rep).entered();
            for cell in grid.start_cells() {
                self.counters.record_start(cell);
                self.metrics.walks_started += 1;
                let mut hooks = Hooks {
                    control: &mut self.control,
                    sink: &mut self.sink,
                    metrics: &mut self.metrics,
                    replication: rep,
                    total_replications: total,
                    step_delay: self.engine.step_delay,
                };
                let outcome = walker.run(cell, &mut self.rng, &mut self.counters, &mut hooks)?;
                match outcome {
                    WalkOutcome::Absorbed { .. } => self.metrics.walks_absorbed += 1,
                    WalkOutcome::Exhausted => self.metrics.walks_exhausted += 1,
                    WalkOutcome::Blocked => self.metrics.walks_blocked += 1,
                    WalkOutcome::Halted(_) => self.metrics.walks_halted += 1,
                }
                if let Some(reason) = self.control.checkpoint() {
                    tracing::info!(?reason, replication = rep, %cell, "run halted");
                    return Ok((Some(reason), rep));
                }
            }
            let done = rep + 1;
            self.replications_done = done;
            tracing::info!(done, total, "replication complete");
            let due = rep % self.engine.summary_interval.max(1) == 0 || done == total;
            if self.control.mode() == DisplayMode::Summary && due {
                self.send_sweep(done, false)?;
            }
        }
        Ok((None, total))
    }

    fn send_sweep(&mut self, done: u32, final_update: bool) -> Result<(), EngineError> {
        let cells = sweep(self.grid, &self.counters);
        let chunks = chunk_sweep(
            &cells,
            self.engine.stats_chunk_size,
            done,
            self.config.replications,
            final_update,
        );
        for chunk in chunks {
            if !deliver(&mut self.sink, &mut self.control, &Message::StatsUpdate(chunk))? {
                break;
            }
            self.metrics.stats_chunks += 1;
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), ResultsError> {
        let cells = sweep(self.grid, &self.counters);
        let layout = self
            .engine
            .persist_metadata
            .then(|| SavedLayout::from_run(self.config, self.grid));
        drunkard_results::persist(Path::new(&self.config.output), &cells, layout.as_ref())
    }

    fn finish(mut self, halt: Option<HaltReason>, done: u32) -> Result<RunReport, EngineError> {
        let persist_error = self.persist().err();
        if let Some(e) = &persist_error {
            tracing::warn!(error = %e, output = %self.config.output, "results not saved");
        }
        self.send_sweep(done, true)?;

        let total = self.config.replications;
        let output = &self.config.output;
        let (outcome, message) = match (halt, &persist_error) {
            (Some(HaltReason::PeerDisconnected), _) => {
                (Outcome::Failed, "Viewer disconnected.".to_string())
            }
            (_, Some(e)) => (
                Outcome::Failed,
                format!("Simulation finished but results could not be saved: {e}"),
            ),
            (Some(HaltReason::Stopped), None) => (
                Outcome::Stopped,
                format!(
                    "Simulation stopped after {done} of {total} replications. Partial results saved to {output}."
                ),
            ),
            (None, None) => (
                Outcome::Completed,
                format!("Simulation completed. Results saved to {output}."),
            ),
        };
        let over = Message::GameOver(GameOver { outcome, message });
        if !deliver(&mut self.sink, &mut self.control, &over)? {
            tracing::warn!(%outcome, "terminal message not delivered");
        }

        let m = &self.metrics;
        tracing::info!(
            %outcome,
            replications = done,
            walks = m.walks_started,
            absorbed = m.walks_absorbed,
            exhausted = m.walks_exhausted,
            blocked = m.walks_blocked,
            steps = m.steps,
            position_events = m.position_events,
            stats_chunks = m.stats_chunks,
            elapsed_us = m.elapsed_us,
            "run finished"
        );
        Ok(RunReport {
            outcome,
            halt,
            replications_done: done,
            counters: self.counters,
            metrics: self.metrics,
            seed: None,
            persist_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Poll;
    use drunkard_core::{ObstacleMode, Probabilities};

    struct Fixed(f64);

    impl UnitSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    struct Quiet;

    impl ControlSource for Quiet {
        fn try_next(&mut self) -> Poll {
            Poll::Idle
        }
        fn wait_next(&mut self) -> Poll {
            Poll::Disconnected
        }
    }

    fn config(output: &Path, mode: DisplayMode, reps: u32) -> SimulationConfig {
        SimulationConfig {
            rows: 2,
            cols: 2,
            replications: reps,
            max_steps: 3,
            probabilities: Probabilities::uniform(),
            obstacles: ObstacleMode::None,
            obstacle_map: None,
            output: output.display().to_string(),
            initial_mode: mode,
        }
    }

    fn temp_output(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("drunkard-sched-{name}-{}.csv", std::process::id()))
    }

    #[test]
    fn summary_sweeps_follow_the_interval() {
        let out = temp_output("interval");
        let cfg = config(&out, DisplayMode::Summary, 7);
        let engine = EngineConfig {
            stats_chunk_size: 10,
            ..EngineConfig::unpaced(1)
        };
        let grid = Grid::open(2, 2);
        let (tx, rx) = crossbeam_channel::unbounded();
        let report = ReplicationScheduler::new(&cfg, &engine, &grid, Fixed(0.6), Quiet, tx)
            .run()
            .unwrap();
        let sent: Vec<Message> = rx.try_iter().collect();
        std::fs::remove_file(&out).ok();

        // Replications 0 and 5, the last (6), then the final sweep.
        let dones: Vec<(u32, bool)> = sent
            .iter()
            .filter_map(|m| match m {
                Message::StatsUpdate(s) => Some((s.replications_done, s.final_update)),
                _ => None,
            })
            .collect();
        assert_eq!(dones, vec![(1, false), (6, false), (7, false), (7, true)]);
        assert!(matches!(sent.last(), Some(Message::GameOver(_))));
        assert_eq!(report.outcome, Outcome::Completed);
        assert_eq!(report.metrics.walks_started, 21);
        assert_eq!(report.metrics.stats_chunks, 4);
        assert!(report.persist_error.is_none());
    }

    #[test]
    fn unwritable_output_fails_the_run() {
        let dir = std::env::temp_dir().join(format!("drunkard-missing-{}", std::process::id()));
        let out = dir.join("nested").join("out.csv");
        let cfg = config(&out, DisplayMode::Summary, 1);
        let engine = EngineConfig::unpaced(1);
        let grid = Grid::open(2, 2);
        let (tx, rx) = crossbeam_channel::unbounded();
        let report = ReplicationScheduler::new(&cfg, &engine, &grid, Fixed(0.6), Quiet, tx)
            .run()
            .unwrap();
        assert_eq!(report.outcome, Outcome::Failed);
        assert!(report.persist_error.is_some());
        let last = rx.try_iter().last();
        assert!(matches!(
            last,
            Some(Message::GameOver(GameOver {
                outcome: Outcome::Failed,
                ..
            }))
        ));
    }

    #[test]
    fn dropped_viewer_halts_without_error() {
        let out = temp_output("dropped");
        let cfg = config(&out, DisplayMode::Interactive, 50);
        let engine = EngineConfig::unpaced(1);
        let grid = Grid::open(2, 2);
        let (tx, rx) = crossbeam_channel::unbounded::<Message>();
        drop(rx);
        let report = ReplicationScheduler::new(&cfg, &engine, &grid, Fixed(0.1), Quiet, tx)
            .run()
            .unwrap();
        std::fs::remove_file(&out).ok();
        assert_eq!(report.halt, Some(HaltReason::PeerDisconnected));
        assert_eq!(report.outcome, Outcome::Failed);
        assert_eq!(report.replications_done, 0);
        assert_eq!(report.metrics.walks_started, 1);
    }
}
