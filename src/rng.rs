//! Seedable random source for mine placement.
//!
//! Wraps `rand::rngs::SmallRng` so board generation takes an explicit
//! `&mut MineRng` instead of reaching for a global generator. Production
//! callers seed from entropy (the browser crypto API on wasm32, via
//! `getrandom`); tests pin a `u64` seed to make layouts reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub struct MineRng {
    inner: SmallRng,
}

impl MineRng {
    /// Entropy-seeded source for real games.
    pub fn from_entropy() -> Self {
        Self {
            inner: SmallRng::from_os_rng(),
        }
    }

    /// Fixed-seed source for deterministic boards.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// Uniform index in `[0, bound)`.
    #[inline]
    pub fn pick(&mut self, bound: usize) -> usize {
        self.inner.random_range(0..bound)
    }
}
