//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through a SimRng seeded from the run
//! configuration, so that the same seed always reproduces the
//! same passenger stream.
//!
//! Range violations (empty choice, min >= max, p outside [0,1])
//! are caller bugs and fail hard. Everything else is infallible.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// The simulation's deterministic random source.
pub struct SimRng {
    seed: u64,
    inner: Pcg64Mcg,
}

impl SimRng {
    /// Create a generator from any integer seed. The seed is
    /// normalized to a positive nonzero value, so 0 and -s map to
    /// well-defined streams.
    pub fn new(seed: i64) -> Self {
        let normalized = seed.unsigned_abs().max(1);
        Self {
            seed: normalized,
            inner: Pcg64Mcg::seed_from_u64(normalized),
        }
    }

    /// The normalized seed this generator was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll an integer in [min, max). Panics when min >= max.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "next_int: invalid range [{min}, {max})");
        let span = (max - min) as u64;
        min + (self.inner.next_u64() % span) as i64
    }

    /// Roll an integer in [0, max). Panics when max <= 0.
    pub fn next_int_below(&mut self, max: i64) -> i64 {
        self.next_int(0, max)
    }

    /// Bernoulli trial: true with probability p. Panics when p is
    /// outside [0, 1].
    pub fn next_bool(&mut self, p: f64) -> bool {
        assert!(
            (0.0..=1.0).contains(&p),
            "next_bool: probability {p} outside [0, 1]"
        );
        self.next_f64() < p
    }

    /// Fair coin flip.
    pub fn chance(&mut self) -> bool {
        self.next_bool(0.5)
    }

    /// Pick a uniformly random element. Panics on an empty slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "choice: empty slice");
        &items[self.next_int_below(items.len() as i64) as usize]
    }

    /// In-place Fisher–Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int_below(i as i64 + 1) as usize;
            items.swap(i, j);
        }
    }

    /// Box–Muller normal sample. Used by the spawner's large-lambda
    /// Poisson approximation.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + std_dev * z
    }
}
