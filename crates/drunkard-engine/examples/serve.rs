//! Serve one viewer over TCP.
//!
//! Listens on the given address (default `127.0.0.1:5555`), accepts a
//! single connection, runs the session the viewer configures, and prints
//! the run report. Set `DRUNKARD_SEED` to reproduce a run; leave it
//! unset for a fresh seed each time.
//!
//! Run with:
//!   cargo run -p drunkard-engine --example serve -- 127.0.0.1:5555

use std::net::TcpListener;

use drunkard_engine::{serve_tcp, EngineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:5555".to_string());
    let engine = EngineConfig {
        seed: std::env::var("DRUNKARD_SEED").ok().and_then(|s| s.parse().ok()),
        ..EngineConfig::default()
    };

    let listener = TcpListener::bind(&addr)?;
    tracing::info!(%addr, "waiting for a viewer");
    let (stream, _) = listener.accept()?;

    let report = serve_tcp(stream, &engine)?;
    println!("outcome:      {}", report.outcome);
    println!("replications: {}", report.replications_done);
    println!("walks:        {}", report.metrics.walks_finished());
    println!("steps:        {}", report.metrics.steps);
    println!("elapsed:      {} us", report.metrics.elapsed_us);
    if let Some(seed) = report.seed {
        println!("seed:         {seed}");
    }
    if let Some(err) = &report.persist_error {
        println!("persist:      {err}");
    }
    Ok(())
}
