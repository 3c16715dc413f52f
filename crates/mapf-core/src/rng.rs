//! Deterministic planner RNG wrapper.
//!
//! # Determinism strategy
//!
//! Every planner instance owns one `SmallRng` seeded from the run's seed.
//! Portfolio restarts seed their own generator through
//! [`PlannerRng::for_restart`], and the warehouse derives sub-streams with
//! [`PlannerRng::child`], so that:
//!
//! - Planners never share RNG state (no contention, no ordering dependency
//!   when restarts run on a thread pool).
//! - The same seed always reproduces the same search trajectory.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Planner-level RNG used for candidate shuffling and PIBT tie-breakers.
///
/// Used only in single-threaded contexts.  If you need parallel randomness,
/// give each worker its own `PlannerRng` via [`child`](Self::child) or
/// [`for_restart`](Self::for_restart).
pub struct PlannerRng(SmallRng);

impl PlannerRng {
    pub fn new(seed: u64) -> Self {
        PlannerRng(SmallRng::seed_from_u64(seed))
    }

    /// Seed for the `restart`-th independent run of a portfolio.
    ///
    /// Restart 0 uses `seed` unchanged so a single-run portfolio matches a
    /// plain `PlannerRng::new(seed)`.
    pub fn for_restart(seed: u64, restart: u64) -> Self {
        PlannerRng::new(seed ^ restart.wrapping_mul(MIXING_CONSTANT))
    }

    /// Derive a child `PlannerRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> PlannerRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        PlannerRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Uniform `f32` in `[0, 1)`; the PIBT tie-breaker.
    #[inline]
    pub fn unit_f32(&mut self) -> f32 {
        self.0.r#gen::<f32>()
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a non-empty slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }
}
