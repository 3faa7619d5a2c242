//! Uniform draws for the walk engine.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A source of uniform draws in `[0, 1)`.
///
/// The walk engine consumes exactly one draw per step, so a scripted
/// source fully determines a trajectory.
pub trait UnitSource {
    /// Next draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl UnitSource for ChaCha8Rng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Build the session RNG, drawing a seed from entropy when none is
/// given. Returns the seed actually used so it can be logged.
pub fn seeded_rng(seed: Option<u64>) -> (ChaCha8Rng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (ChaCha8Rng::seed_from_u64(seed), seed)
}
