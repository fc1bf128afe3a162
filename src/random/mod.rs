//! Random number generation for the simulation.
//!
//! A run consumes a single random stream. The stream is created once from an explicit seed
//! and passed to the engine, so two runs with the same seed and parameters produce the same
//! event sequence, and several engines can live in one process without sharing state.
mod sampling_algorithms;

use rand::SeedableRng;

pub use sampling_algorithms::sample_index_excluding;

/// The generator used by the command line tool.
pub type SimulationRng = rand::rngs::StdRng;

/// Creates the simulation's random stream from `seed`.
#[must_use]
pub fn seeded_rng(seed: u64) -> SimulationRng {
    log::trace!("initializing random stream with seed {seed}");
    SimulationRng::seed_from_u64(seed)
}
