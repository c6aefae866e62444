//! Seeded random number generation.
//!
//! Every randomized component receives its generator explicitly; nothing in
//! the crate reads process-global random state except [`fresh_seed`], which
//! is only used when the caller did not pin a seed.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates a reproducible generator from a 64-bit seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Draws a seed from the operating system generator.
pub fn fresh_seed() -> u64 {
    rand::random()
}
