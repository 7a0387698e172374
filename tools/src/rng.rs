//! Deterministic random number generation for the demo data generator.
//!
//! RULE: nothing in the generator may call a platform RNG. All draws
//! flow through one `DataRng` seeded from the CLI seed, so the same
//! seed always yields the same synthetic dataset.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct DataRng {
    inner: Pcg64Mcg,
}

impl DataRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: Pcg64Mcg::seed_from_u64(seed) }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an i64 in [low, high] inclusive.
    pub fn range_i64(&mut self, low: i64, high: i64) -> i64 {
        assert!(low <= high, "low must be <= high");
        low + self.next_u64_below((high - low + 1) as u64) as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Sample from a simplified Pareto distribution.
    /// x_min: minimum value, alpha: shape parameter (higher = less skewed).
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        let u = self.next_f64().max(1e-10);
        x_min * u.powf(-1.0 / alpha)
    }

    /// Pick one element of a non-empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Pick an index from a weight table (weights need not sum to 1).
    pub fn pick_weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut roll = self.next_f64() * total;
        for (index, weight) in weights.iter().enumerate() {
            roll -= weight;
            if roll < 0.0 {
                return index;
            }
        }
        weights.len() - 1
    }
}
