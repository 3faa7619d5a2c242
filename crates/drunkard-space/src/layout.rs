//! Obstacle layout generation and the connectivity check.
//!
//! A random layout places `rows * cols / 5` obstacles at uniformly random
//! non-center cells, then runs a breadth-first search from the center over
//! free cells. A layout that leaves any free cell unreachable is discarded
//! and regenerated, up to a caller-supplied attempt cap.

use std::collections::VecDeque;

use drunkard_core::{Cell, ConfigError, ObstacleMode, SimulationConfig};
use rand::Rng;
use tracing::debug;

use crate::edge::EdgeBehavior;
use crate::error::LayoutError;
use crate::grid::Grid;

/// Build the grid for `config`.
///
/// - [`ObstacleMode::None`]: every cell free.
/// - [`ObstacleMode::Explicit`]: the supplied bitmap, verbatim.
/// - [`ObstacleMode::Random`]: [`random_layout`] with `max_attempts`.
pub fn build_layout<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
    max_attempts: u32,
) -> Result<Grid, LayoutError> {
    config.validate()?;
    match config.obstacles {
        ObstacleMode::None => Ok(Grid::open(config.rows, config.cols)),
        ObstacleMode::Explicit => {
            let map = config
                .obstacle_map
                .as_deref()
                .ok_or(LayoutError::Config(ConfigError::MissingObstacleMap))?;
            Grid::from_bitmap(config.rows, config.cols, map)
        }
        ObstacleMode::Random => random_layout(config.rows, config.cols, rng, max_attempts),
    }
}

/// Generate a fully connected random layout.
///
/// Every returned grid satisfies [`is_fully_connected`]. Fails with
/// [`LayoutError::NotConverged`] after `max_attempts` rejected layouts.
pub fn random_layout<R: Rng + ?Sized>(
    rows: u32,
    cols: u32,
    rng: &mut R,
    max_attempts: u32,
) -> Result<Grid, LayoutError> {
    let target = (rows as usize * cols as usize) / 5;
    for attempt in 1..=max_attempts {
        let grid = place_obstacles(rows, cols, target, rng);
        if is_fully_connected(&grid) {
            debug!(rows, cols, obstacles = target, attempt, "random layout accepted");
            return Ok(grid);
        }
        debug!(attempt, "random layout disconnected, regenerating");
    }
    Err(LayoutError::NotConverged {
        attempts: max_attempts,
    })
}

fn place_obstacles<R: Rng + ?Sized>(rows: u32, cols: u32, target: usize, rng: &mut R) -> Grid {
    let mut grid = Grid::open(rows, cols);
    let mut placed = 0;
    // target <= cell_count - 1, so there is always a free non-center cell.
    while placed < target {
        let cell = Cell::new(rng.random_range(0..cols), rng.random_range(0..rows));
        if cell.is_center() || grid.is_obstacle(cell) {
            continue;
        }
        grid.set_obstacle(cell, true);
        placed += 1;
    }
    grid
}

/// Whether every free cell is reachable from the center through free
/// cells, moving only inside the grid.
pub fn is_fully_connected(grid: &Grid) -> bool {
    let mut visited = vec![false; grid.cell_count()];
    let mut queue = VecDeque::new();

    visited[grid.index(Cell::CENTER)] = true;
    queue.push_back(Cell::CENTER);
    let mut reached = 1usize;

    while let Some(cell) = queue.pop_front() {
        for next in grid.free_neighbours(cell, EdgeBehavior::Clamp) {
            let i = grid.index(next);
            if !visited[i] {
                visited[i] = true;
                reached += 1;
                queue.push_back(next);
            }
        }
    }

    reached == grid.cell_count() - grid.obstacle_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use drunkard_core::{DisplayMode, Probabilities};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config(rows: u32, cols: u32, obstacles: ObstacleMode) -> SimulationConfig {
        SimulationConfig {
            rows,
            cols,
            replications: 1,
            max_steps: 10,
            probabilities: Probabilities::uniform(),
            obstacles,
            obstacle_map: None,
            output: "out.csv".into(),
            initial_mode: DisplayMode::Summary,
        }
    }

    #[test]
    fn none_mode_is_open() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let g = build_layout(&config(4, 4, ObstacleMode::None), &mut rng, 10).unwrap();
        assert_eq!(g.obstacle_count(), 0);
    }

    #[test]
    fn explicit_mode_copies_map_without_connectivity_check() {
        // (2, 2) is sealed off by obstacles at (1, 2) and (2, 1).
        let mut cfg = config(3, 3, ObstacleMode::Explicit);
        let mut map = vec![false; 9];
        map[Cell::new(1, 2).index(3)] = true;
        map[Cell::new(2, 1).index(3)] = true;
        cfg.obstacle_map = Some(map.clone());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let g = build_layout(&cfg, &mut rng, 10).unwrap();
        assert_eq!(g.bitmap(), map.as_slice());
        assert!(!is_fully_connected(&g));
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = build_layout(&config(0, 4, ObstacleMode::Random), &mut rng, 10).unwrap_err();
        assert!(matches!(err, LayoutError::Config(_)));
    }

    #[test]
    fn random_layout_has_one_fifth_obstacles() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let g = random_layout(10, 10, &mut rng, 1000).unwrap();
        assert_eq!(g.obstacle_count(), 20);
        assert!(!g.is_obstacle(Cell::CENTER));
    }

    #[test]
    fn tiny_grid_has_no_obstacles() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let g = random_layout(1, 2, &mut rng, 1).unwrap();
        assert_eq!(g.obstacle_count(), 0);
    }

    #[test]
    fn zero_attempts_never_converges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(
            random_layout(5, 5, &mut rng, 0),
            Err(LayoutError::NotConverged { attempts: 0 })
        );
    }

    #[test]
    fn sealed_pocket_is_disconnected() {
        let mut g = Grid::open(3, 3);
        g.set_obstacle(Cell::new(1, 0), true);
        g.set_obstacle(Cell::new(0, 1), true);
        assert!(!is_fully_connected(&g));
    }

    #[test]
    fn open_grid_is_connected() {
        assert!(is_fully_connected(&Grid::open(6, 3)));
    }

    proptest! {
        #[test]
        fn random_layouts_are_fully_connected(
            rows in 1u32..16,
            cols in 1u32..16,
            seed in any::<u64>(),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            // A 1-wide corridor can easily be cut, so allow plenty of retries.
            if let Ok(g) = random_layout(rows, cols, &mut rng, 10_000) {
                prop_assert!(is_fully_connected(&g));
                prop_assert!(!g.is_obstacle(Cell::CENTER));
                prop_assert_eq!(g.obstacle_count(), (rows * cols / 5) as usize);
            }
        }
    }
}
