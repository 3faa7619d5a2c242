//! Process-local engine settings.
//!
//! [`EngineConfig`] holds everything that is not part of the
//! wire-delivered [`SimulationConfig`](drunkard_core::SimulationConfig):
//! pacing, chunking, retry caps and seeding. It is built with
//! `Default` and checked with [`validate()`](EngineConfig::validate).

use std::time::Duration;

use drunkard_wire::LEN_PREFIX;

use crate::error::EngineError;

// ── EngineConfig ───────────────────────────────────────────────────

/// Settings for one compute-side session.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Pause after each position event in Interactive mode. Default: 100 ms.
    pub step_delay: Duration,
    /// Cells per statistics chunk. Default: 50.
    pub stats_chunk_size: usize,
    /// Random layouts generated before giving up. Default: 1000.
    pub max_layout_attempts: u32,
    /// RNG seed. `None` draws one from entropy. Default: `None`.
    pub seed: Option<u64>,
    /// In Summary mode, a sweep is sent after replications whose index
    /// is a multiple of this. Default: 5.
    pub summary_interval: u32,
    /// Write the parameter line and obstacle map ahead of the results
    /// table. Default: true.
    pub persist_metadata: bool,
    /// Largest inbound frame accepted. Default: 1 MiB.
    pub max_frame_len: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(100),
            stats_chunk_size: 50,
            max_layout_attempts: 1000,
            seed: None,
            summary_interval: 5,
            persist_metadata: true,
            max_frame_len: drunkard_wire::MAX_FRAME_LEN,
        }
    }
}

impl EngineConfig {
    /// Settings for tests and benchmarks: no pacing and a fixed seed.
    pub fn unpaced(seed: u64) -> Self {
        Self {
            step_delay: Duration::ZERO,
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), EngineError> {
        let reject = |reason: &str| {
            Err(EngineError::InvalidEngineConfig {
                reason: reason.to_string(),
            })
        };
        if self.stats_chunk_size == 0 {
            return reject("stats_chunk_size must be at least 1");
        }
        if self.max_layout_attempts == 0 {
            return reject("max_layout_attempts must be at least 1");
        }
        if self.summary_interval == 0 {
            return reject("summary_interval must be at least 1");
        }
        if (self.max_frame_len as usize) <= LEN_PREFIX {
            return reject("max_frame_len is too small to carry any message");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let c = EngineConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.step_delay, Duration::from_millis(100));
        assert_eq!(c.stats_chunk_size, 50);
        assert_eq!(c.summary_interval, 5);
        assert!(c.seed.is_none());
    }

    #[test]
    fn unpaced_is_seeded_and_fast() {
        let c = EngineConfig::unpaced(7);
        assert_eq!(c.seed, Some(7));
        assert!(c.step_delay.is_zero());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_settings_are_rejected() {
        for c in [
            EngineConfig {
                stats_chunk_size: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                max_layout_attempts: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                summary_interval: 0,
                ..EngineConfig::default()
            },
            EngineConfig {
                max_frame_len: 2,
                ..EngineConfig::default()
            },
        ] {
            assert!(matches!(
                c.validate(),
                Err(EngineError::InvalidEngineConfig { .. })
            ));
        }
    }
}
