// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deterministic RNG context. The one source of randomness for a corpus run;
// handed to every builder by `&mut`, never looked up globally.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Seeded generator shared by all page builders of a run.
///
/// ChaCha8 is used because its output stream is specified independently of
/// platform and `rand` version, which keeps corpora reproducible.
#[derive(Debug, Clone)]
pub struct CorpusRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl CorpusRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// The seed this generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform draw from `[low, high)`.
    #[inline]
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.inner.gen_range(low..high)
    }

    /// Draw from the standard normal distribution N(0, 1).
    #[inline]
    pub fn standard_normal(&mut self) -> f32 {
        self.inner.sample(StandardNormal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = CorpusRng::new(1337);
        let mut b = CorpusRng::new(1337);
        for _ in 0..64 {
            assert_eq!(a.uniform(0.6, 0.98).to_bits(), b.uniform(0.6, 0.98).to_bits());
            assert_eq!(a.standard_normal().to_bits(), b.standard_normal().to_bits());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = CorpusRng::new(1);
        let mut b = CorpusRng::new(2);
        let draws_a: Vec<f64> = (0..8).map(|_| a.uniform(0.0, 1.0)).collect();
        let draws_b: Vec<f64> = (0..8).map(|_| b.uniform(0.0, 1.0)).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn uniform_respects_bounds() {
        let mut rng = CorpusRng::new(7);
        for _ in 0..1000 {
            let v = rng.uniform(0.4, 0.7);
            assert!((0.4..0.7).contains(&v), "{v} out of range");
        }
        assert_eq!(rng.uniform(3.0, 3.0), 3.0);
        assert_eq!(rng.seed(), 7);
    }

    #[test]
    fn normal_draws_are_centred() {
        let mut rng = CorpusRng::new(99);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.standard_normal() as f64).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean {mean} too far from 0");
    }
}
