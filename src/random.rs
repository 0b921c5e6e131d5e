//! Explicitly owned random sources.
//!
//! The engine never touches a global generator. Every run owns one
//! [`StdRng`] created from the strategy seed, and operators receive it
//! through their [`Context`](crate::operators::Context).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derives an independent generator from an existing one.
///
/// Used to hand each worker its own stream while keeping the parent
/// stream reproducible.
pub fn fork_rng<R: Rng + ?Sized>(rng: &mut R) -> StdRng {
    StdRng::seed_from_u64(rng.random())
}
