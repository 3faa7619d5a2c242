//! Configuration fixtures.

use std::path::{Path, PathBuf};

use drunkard_core::{DisplayMode, ObstacleMode, Probabilities, SimulationConfig};

/// An open 3×3 grid, one replication, `K = 10`, uniform probabilities,
/// Interactive mode.
pub fn small_open_config(output: &Path) -> SimulationConfig {
    SimulationConfig {
        rows: 3,
        cols: 3,
        replications: 1,
        max_steps: 10,
        probabilities: Probabilities::uniform(),
        obstacles: ObstacleMode::None,
        obstacle_map: None,
        output: output.display().to_string(),
        initial_mode: DisplayMode::Interactive,
    }
}

/// A 3×3 grid whose corner `(2, 2)` is walled in by obstacles at
/// `(1, 2)` and `(2, 1)`.
pub fn enclosed_corner_config(output: &Path) -> SimulationConfig {
    let mut map = vec![false; 9];
    map[2 * 3 + 1] = true;
    map[3 + 2] = true;
    SimulationConfig {
        obstacles: ObstacleMode::Explicit,
        obstacle_map: Some(map),
        ..small_open_config(output)
    }
}

/// A results path under the system temp directory, unique per process
/// and `name`.
pub fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("drunkard-{name}-{}.csv", std::process::id()))
}

/// Removes the file at its path when dropped.
pub struct TempOutput(pub PathBuf);

impl TempOutput {
    pub fn new(name: &str) -> Self {
        Self(temp_output(name))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for TempOutput {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}
