//! The run's single source of randomness.
//!
//! # Determinism strategy
//!
//! Every stochastic quantity of a run (inter-arrival gaps, service durations,
//! priority classes) is drawn from one `VariateGenerator`, seeded once at
//! construction.  The model consumes draws in a fixed order, so the same seed
//! and configuration always replay the identical event sequence.
//!
//! Independent runs (batch replications) each own their own generator; no
//! RNG state is shared between runs.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Seedable uniform / exponential / Bernoulli variate source.
pub struct VariateGenerator {
    rng:  SmallRng,
    seed: u64,
}

impl VariateGenerator {
    /// Seed explicitly: use in tests and for replaying a run.
    pub fn new(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed), seed }
    }

    /// Seed from OS entropy.  The chosen seed is kept so the run can be
    /// replayed later via [`seed`](Self::seed).
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().r#gen())
    }

    /// The seed this generator was constructed with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw in the open interval `(0, 1)`.
    ///
    /// The underlying draw is in `[0, 1)`; zero is re-drawn so callers can
    /// take its logarithm.
    pub fn unit_open(&mut self) -> f64 {
        loop {
            let u: f64 = self.rng.r#gen();
            if u > 0.0 {
                return u;
            }
        }
    }

    /// Uniform draw in `[lo, hi)`.  Returns `lo` when the interval is empty.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let u: f64 = self.rng.r#gen();
        lo + u * (hi - lo).max(0.0)
    }

    /// Exponential draw with the given mean, by inverse transform:
    /// `-mean * ln(u)` with `u` in `(0, 1)`.  Never negative for `mean >= 0`.
    pub fn exponential(&mut self, mean: f64) -> f64 {
        -mean * self.unit_open().ln()
    }

    /// `true` with probability `p` (clamped to `[0, 1]`).
    #[inline]
    pub fn bernoulli(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }
}
