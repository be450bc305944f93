//! Deterministic per-pedestrian and simulation-level RNG wrappers.
//!
//! Each pedestrian gets its own `SmallRng` seeded by
//!
//!   seed = global_seed XOR (ped_id * MIXING_CONSTANT)
//!
//! with the 64-bit fractional golden ratio as mixing constant, so consecutive
//! IDs spread across the seed space and adding pedestrians at the end of the
//! crowd leaves the existing streams untouched.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::PedId;

const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── PedRng ────────────────────────────────────────────────────────────────────

/// Per-pedestrian deterministic RNG.  Drives the probabilistic knowledge
/// merge; never touched by routing queries.
#[derive(Clone, Debug)]
pub struct PedRng(SmallRng);

impl PedRng {
    pub fn new(global_seed: u64, ped: PedId) -> Self {
        let seed = global_seed ^ (ped.0 as u64).wrapping_mul(MIXING_CONSTANT);
        PedRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform sample in `[0, 1)`.
    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]; NaN counts as 0).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG for global draws (e.g. sampling per-pedestrian risk
/// tolerance at crowd construction).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
