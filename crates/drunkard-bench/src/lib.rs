//! Benchmark profiles for the drunkard simulator.
//!
//! - [`reference_config`]: a 100 × 100 open grid, the largest allowed
//! - [`obstacle_config`]: the same grid with random obstacles
//! - [`reference_grid`]: build the grid for a profile with a fixed seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use drunkard_core::{
    DisplayMode, ObstacleMode, Probabilities, SimulationConfig, MAX_GRID_SIZE,
};
use drunkard_space::{build_layout, Grid, LayoutError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Open `MAX_GRID_SIZE`² grid, `K = 1000`, a slight pull towards the
/// origin, Summary mode.
pub fn reference_config(replications: u32) -> SimulationConfig {
    SimulationConfig {
        rows: MAX_GRID_SIZE,
        cols: MAX_GRID_SIZE,
        replications,
        max_steps: 1000,
        probabilities: Probabilities {
            up: 0.3,
            down: 0.2,
            left: 0.3,
            right: 0.2,
        },
        obstacles: ObstacleMode::None,
        obstacle_map: None,
        output: std::env::temp_dir()
            .join("drunkard-bench.csv")
            .display()
            .to_string(),
        initial_mode: DisplayMode::Summary,
    }
}

/// [`reference_config`] with randomly placed obstacles.
pub fn obstacle_config(replications: u32) -> SimulationConfig {
    SimulationConfig {
        obstacles: ObstacleMode::Random,
        ..reference_config(replications)
    }
}

/// Build the grid for `config` with a seeded RNG.
pub fn reference_grid(config: &SimulationConfig, seed: u64) -> Result<Grid, LayoutError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    build_layout(config, &mut rng, 1000)
}
