//! Random source: the only place randomness enters a colony run.
//!
//! Ants draw through [`RandomSource`], which every `rand` generator
//! implements. Seeded runs derive one independent stream per
//! `(seed, iteration, ant)` so results do not depend on scheduling order.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform draws used by ants when picking their next step.
pub trait RandomSource {
    /// A uniform value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// A uniform index in `0..n`. `n` must be non-zero.
    fn next_index(&mut self, n: usize) -> usize;
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn next_index(&mut self, n: usize) -> usize {
        self.gen_range(0..n)
    }
}

/// splitmix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Seed for one ant's stream in one iteration.
pub fn stream_seed(seed: u64, iteration: u64, ant: u32) -> u64 {
    mix(mix(mix(seed) ^ iteration) ^ u64::from(ant))
}

/// An independent generator for one ant in one iteration.
pub fn ant_rng(seed: u64, iteration: u64, ant: u32) -> StdRng {
    StdRng::seed_from_u64(stream_seed(seed, iteration, ant))
}

/// A fresh run seed from the thread-local generator.
pub fn fresh_seed() -> u64 {
    rand::thread_rng().gen()
}
