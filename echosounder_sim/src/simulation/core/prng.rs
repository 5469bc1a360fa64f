// echosounder_sim/src/simulation/core/prng.rs

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The central, deterministic pseudo-random number generator for a run.
pub type SimulationRng = ChaCha8Rng;

/// Builds the run's generator from a seed, so the same seed always yields
/// the same scenario.
pub fn seeded_rng(seed: u64) -> SimulationRng {
    ChaCha8Rng::seed_from_u64(seed)
}
