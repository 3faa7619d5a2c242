//! One compute-side session: handshake, layout, run, terminal message.

use std::io::Read;
use std::net::{Shutdown, TcpStream};
use std::thread::{self, JoinHandle};

use crossbeam_channel::unbounded;
use drunkard_core::{GameOver, Message, Outcome, SimulationConfig};
use drunkard_space::build_layout;
use drunkard_wire::{FrameAssembler, MessageReader, MessageWriter, WireError};

use crate::config::EngineConfig;
use crate::control::{ChannelControl, ControlSource};
use crate::error::EngineError;
use crate::rng::seeded_rng;
use crate::scheduler::{ReplicationScheduler, RunReport};
use crate::sink::Outbound;

/// Read the opening message of a session.
///
/// The peer must open with `Config`. `LoadConfig` is recognised but not
/// served here; anything else, or a close, is a handshake failure.
pub fn handshake<R: Read>(reader: &mut MessageReader<R>) -> Result<SimulationConfig, EngineError> {
    match reader.recv()? {
        Some(Message::Config(config)) => Ok(config),
        Some(Message::LoadConfig { path }) => {
            tracing::warn!(%path, "load requests are handled by the viewer");
            Err(EngineError::UnsupportedRequest { kind: "LoadConfig" })
        }
        Some(other) => Err(EngineError::Handshake {
            detail: format!("expected Config, got {}", other.kind()),
        }),
        None => Err(EngineError::Handshake {
            detail: "peer closed before sending a configuration".into(),
        }),
    }
}

/// Forward inbound control commands from `reader` to a channel on a
/// dedicated thread.
///
/// The thread exits when the peer closes or the stream fails, which the
/// returned [`ChannelControl`] reports as a disconnect.
pub fn spawn_control_reader<R>(
    mut reader: MessageReader<R>,
) -> Result<(ChannelControl, JoinHandle<()>), EngineError>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = unbounded();
    let handle = thread::Builder::new()
        .name("drunkard-control".into())
        .spawn(move || loop {
            match reader.recv() {
                Ok(Some(Message::Control(cmd))) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Ok(Some(other)) => {
                    tracing::warn!(kind = other.kind(), "ignoring unexpected inbound message");
                }
                Ok(None) => {
                    tracing::debug!("viewer closed the control stream");
                    break;
                }
                Err(e) if e.is_disconnect() => {
                    tracing::debug!(error = %e, "viewer dropped the control stream");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "control stream failed");
                    break;
                }
            }
        })
        .map_err(|e| EngineError::ThreadSpawnFailed {
            reason: e.to_string(),
        })?;
    Ok((ChannelControl::new(rx), handle))
}

/// Send a failure terminal message, logging instead of failing if the
/// peer is already gone.
fn send_failure<O: Outbound + ?Sized>(sink: &mut O, error: &EngineError) {
    let msg = Message::GameOver(GameOver {
        outcome: Outcome::Failed,
        message: error.to_string(),
    });
    if let Err(e) = sink.send(&msg) {
        tracing::warn!(error = %e, "failure message not delivered");
    }
}

/// Run a session for an already received configuration.
///
/// Validates both configurations, builds the grid, runs the scheduler
/// and returns its report. Any error is reported to the viewer with a
/// failed terminal message before it is returned.
pub fn run_session<C, O>(
    config: SimulationConfig,
    engine: &EngineConfig,
    control: C,
    mut sink: O,
) -> Result<RunReport, EngineError>
where
    C: ControlSource,
    O: Outbound,
{
    let _span = tracing::info_span!(
        "session",
        rows = config.rows,
        cols = config.cols,
        replications = config.replications
    )
    .entered();
    match start(&config, engine, control, &mut sink) {
        Ok(report) => Ok(report),
        Err(e) => {
            tracing::warn!(error = %e, "session failed");
            send_failure(&mut sink, &e);
            Err(e)
        }
    }
}

fn start<C: ControlSource, O: Outbound>(
    config: &SimulationConfig,
    engine: &EngineConfig,
    control: C,
    sink: &mut O,
) -> Result<RunReport, EngineError> {
    engine.validate()?;
    config.validate()?;
    let (mut rng, seed) = seeded_rng(engine.seed);
    let grid = build_layout(config, &mut rng, engine.max_layout_attempts)?;
    tracing::info!(
        seed,
        obstacles = grid.obstacle_count(),
        max_steps = config.max_steps,
        mode = ?config.initial_mode,
        output = %config.output,
        "session starting"
    );
    let mut report = ReplicationScheduler::new(config, engine, &grid, rng, control, sink).run()?;
    report.seed = Some(seed);
    Ok(report)
}

/// Serve one viewer over an accepted TCP connection.
///
/// Performs the handshake, forwards control commands on a reader thread,
/// runs the session, then shuts the socket down and joins the reader.
pub fn serve_tcp(stream: TcpStream, engine: &EngineConfig) -> Result<RunReport, EngineError> {
    let peer = stream.peer_addr().ok();
    tracing::info!(?peer, "viewer connected");
    let mut writer = MessageWriter::new(stream.try_clone().map_err(WireError::from)?);
    let mut reader = MessageReader::with_assembler(
        stream.try_clone().map_err(WireError::from)?,
        FrameAssembler::with_max_frame_len(engine.max_frame_len),
    );

    let config = match handshake(&mut reader) {
        Ok(config) => config,
        Err(e) => {
            send_failure(&mut writer, &e);
            if let Err(err) = stream.shutdown(Shutdown::Both) {
                tracing::debug!(error = %err, "shutdown after failed handshake");
            }
            return Err(e);
        }
    };
    let (control, reader_thread) = spawn_control_reader(reader)?;
    let result = run_session(config, engine, control, &mut writer);

    if let Err(e) = stream.shutdown(Shutdown::Both) {
        tracing::debug!(error = %e, "socket already closed");
    }
    if reader_thread.join().is_err() {
        tracing::warn!("control reader thread panicked");
    }
    result
}
