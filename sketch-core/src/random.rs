//! Seeded randomness for reproducible runs.
//!
//! Every random draw in a run comes from one [`SketchRng`] created when the
//! drawable is initialised. Actions and noise generators receive it by
//! reference; nothing reads an ambient generator.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Largest generated seed.
pub const MAX_SEED: u32 = 1 << 20;

/// Generate a fresh seed in `1..=MAX_SEED`.
///
/// This is the only nondeterministic call in a run.
#[must_use]
pub fn generate_seed() -> u32 {
    rand::rng().random_range(1..=MAX_SEED)
}

/// The per-run deterministic generator.
#[derive(Debug, Clone)]
pub struct SketchRng {
    rng: Pcg64Mcg,
}

impl SketchRng {
    /// Create a generator from a run seed.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(u64::from(seed)),
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.random()
    }

    /// Uniform value in `[low, high)`.
    ///
    /// Returns `low` for an empty range, or when the bounds are NaN or span
    /// more than `f64::MAX`.
    pub fn range(&mut self, low: f64, high: f64) -> f64 {
        let span = high - low;
        if !span.is_finite() || span <= 0.0 {
            return low;
        }
        self.rng.random_range(low..high)
    }

    /// Uniform integer in `[low, high)`; returns `low` for an empty range.
    pub fn range_int(&mut self, low: i64, high: i64) -> i64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..high)
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Normally distributed value (Box–Muller).
    pub fn gaussian(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = 1.0 - self.unit();
        let u2 = self.unit();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + sd * z
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }

    /// Borrow the underlying generator for APIs that take `impl Rng`.
    pub fn as_rng_mut(&mut self) -> &mut Pcg64Mcg {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SketchRng::new(42);
        let mut b = SketchRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.unit().to_bits(), b.unit().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SketchRng::new(1);
        let mut b = SketchRng::new(2);
        let xs: Vec<u64> = (0..8).map(|_| a.unit().to_bits()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.unit().to_bits()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_ranges() {
        let mut rng = SketchRng::new(9);
        for _ in 0..200 {
            let x = rng.range(-2.0, 3.0);
            assert!((-2.0..3.0).contains(&x));
            let i = rng.range_int(5, 8);
            assert!((5..8).contains(&i));
        }
        assert!((rng.range(1.0, 1.0) - 1.0).abs() < f64::EPSILON);
        assert_eq!(rng.range_int(4, 2), 4);
    }

    #[test]
    fn test_degenerate_ranges_return_low() {
        let mut rng = SketchRng::new(5);
        assert!(rng.range(f64::NAN, 1.0).is_nan());
        assert_eq!(rng.range(0.5, f64::NAN).to_bits(), 0.5_f64.to_bits());
        assert_eq!(rng.range(0.0, f64::INFINITY).to_bits(), 0.0_f64.to_bits());
        assert_eq!(rng.range(-f64::MAX, f64::MAX).to_bits(), (-f64::MAX).to_bits());
        assert_eq!(rng.range(2.0, 2.0).to_bits(), 2.0_f64.to_bits());
    }

    #[test]
    fn test_generated_seed_bounds() {
        for _ in 0..100 {
            let seed = generate_seed();
            assert!((1..=MAX_SEED).contains(&seed));
        }
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = SketchRng::new(3);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert!(rng.pick(&[1, 2, 3]).is_some());
    }
}
