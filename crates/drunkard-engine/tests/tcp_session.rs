//! A viewer and the compute side talking over a loopback socket.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use drunkard_core::{ControlCommand, DisplayMode, Message, Outcome};
use drunkard_engine::{serve_tcp, EngineConfig, EngineError, Phase, RunReport, ViewerState};
use drunkard_test_utils::fixtures::{small_open_config, TempOutput};
use drunkard_wire::{MessageReader, MessageWriter};

type Server = thread::JoinHandle<Result<RunReport, EngineError>>;

fn spawn_server(engine: EngineConfig) -> (SocketAddr, Server) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        serve_tcp(stream, &engine)
    });
    (addr, handle)
}

#[test]
fn summary_run_over_tcp_completes() {
    let out = TempOutput::new("tcp-summary");
    let mut config = small_open_config(out.path());
    config.replications = 6;
    config.initial_mode = DisplayMode::Summary;

    let (addr, server) = spawn_server(EngineConfig {
        stats_chunk_size: 4,
        ..EngineConfig::unpaced(5)
    });
    let stream = TcpStream::connect(addr).unwrap();
    let mut writer = MessageWriter::new(stream.try_clone().unwrap());
    let mut reader = MessageReader::new(stream);
    writer.send(&Message::Config(config)).unwrap();

    let mut view = ViewerState::new();
    while let Some(msg) = reader.recv().unwrap() {
        if view.apply(&msg) {
            break;
        }
    }
    drop(writer);

    let report = server.join().unwrap().unwrap();
    assert_eq!(report.outcome, Outcome::Completed);
    match view.phase() {
        Phase::Finished(over) => assert_eq!(over.outcome, Outcome::Completed),
        Phase::Running => panic!("no terminal message"),
    }
    assert!(view.table().is_final());
    assert_eq!(view.table().len(), 9);
    assert_eq!(view.table().progress(), (6, 6));
    assert!(out.path().exists());
}

#[test]
fn stop_over_tcp_ends_with_stopped() {
    let out = TempOutput::new("tcp-stop");
    let mut config = small_open_config(out.path());
    config.replications = 10_000;

    let (addr, server) = spawn_server(EngineConfig {
        step_delay: Duration::from_millis(1),
        ..EngineConfig::unpaced(5)
    });
    let stream = TcpStream::connect(addr).unwrap();
    let mut writer = MessageWriter::new(stream.try_clone().unwrap());
    let mut reader = MessageReader::new(stream);
    writer.send(&Message::Config(config)).unwrap();

    let mut view = ViewerState::new();
    let mut sent_stop = false;
    while let Some(msg) = reader.recv().unwrap() {
        if !sent_stop && matches!(msg, Message::StateUpdate(_)) {
            writer.send(&Message::Control(ControlCommand::Stop)).unwrap();
            sent_stop = true;
        }
        if view.apply(&msg) {
            break;
        }
    }

    let report = server.join().unwrap().unwrap();
    assert_eq!(report.outcome, Outcome::Stopped);
    assert!(report.replications_done < 10_000);
    assert!(view.walker().is_some());
    assert!(matches!(view.phase(), Phase::Finished(o) if o.outcome == Outcome::Stopped));
}

#[test]
fn load_request_is_refused_over_tcp() {
    let (addr, server) = spawn_server(EngineConfig::unpaced(1));
    let stream = TcpStream::connect(addr).unwrap();
    let mut writer = MessageWriter::new(stream.try_clone().unwrap());
    let mut reader = MessageReader::new(stream);
    writer
        .send(&Message::LoadConfig {
            path: "previous.csv".into(),
        })
        .unwrap();

    let reply = reader.recv().unwrap();
    assert!(matches!(
        reply,
        Some(Message::GameOver(ref over)) if over.outcome == Outcome::Failed
    ));
    assert!(matches!(
        server.join().unwrap(),
        Err(EngineError::UnsupportedRequest { .. })
    ));
}
