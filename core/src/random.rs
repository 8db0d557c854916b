//! Randomness port for the scoring jitter.
//!
//! The engine only ever asks for "a uniform value in `[low, high)`", so the
//! port is a single method. Production wraps any `rand::Rng`; tests use
//! [`SequenceRandom`] to pin every draw.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait RandomSource {
    /// A value drawn from `[low, high)`. `low == high` returns `low`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (**self).uniform(low, high)
    }
}

/// Production source: ChaCha8, seeded or from OS entropy.
pub type ChaChaSource = RngSource<ChaCha8Rng>;

/// Adapter from a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.0.gen_range(low..high)
    }
}

impl RngSource<ChaCha8Rng> {
    /// Reproducible stream for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Fresh OS-seeded stream; no reproducibility contract.
    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }
}

/// Cycles through fixed fractions of the requested range.
///
/// A fraction `f` maps to `low + f * (high - low)`, so `0.5` always lands in
/// the middle of whatever range the engine asks for. Fractions are clamped
/// into `[0, 1]`, and a result that reaches `high` is stepped just below it.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    fractions: Vec<f64>,
    pos: usize,
}

impl SequenceRandom {
    pub fn new(fractions: Vec<f64>) -> Self {
        let fractions = if fractions.is_empty() { vec![0.5] } else { fractions };
        Self { fractions, pos: 0 }
    }

    /// Every draw returns the same fraction.
    pub fn constant(fraction: f64) -> Self {
        Self::new(vec![fraction])
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        let f = self.fractions[self.pos % self.fractions.len()];
        self.pos = self.pos.wrapping_add(1);
        let v = low + f.clamp(0.0, 1.0) * (high - low);
        if high > low && v >= high {
            return prev_float(high);
        }
        v
    }
}

/// Largest `f64` strictly below `x`.
fn prev_float(x: f64) -> f64 {
    if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else if x < 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        -f64::from_bits(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_cycles() {
        let mut r = SequenceRandom::new(vec![0.0, 0.5]);
        assert_eq!(r.uniform(10.0, 20.0), 10.0);
        assert_eq!(r.uniform(10.0, 20.0), 15.0);
        assert_eq!(r.uniform(0.0, 2.0), 0.0);
    }

    #[test]
    fn test_sequence_stays_below_high() {
        let mut r = SequenceRandom::constant(1.0);
        assert!(r.uniform(30.0, 70.0) < 70.0);
        assert!(r.uniform(70.0, 90.0) < 90.0);
        let v = r.uniform(-7.5, -2.0);
        assert!((-7.5..-2.0).contains(&v));
        assert!(r.uniform(-1.0, 0.0) < 0.0);
        assert_eq!(r.uniform(5.0, 5.0), 5.0);
    }

    #[test]
    fn test_compatible_numerology_draw_below_90() {
        let mut r = SequenceRandom::constant(1.0);
        let v = r.uniform(70.0, 90.0);
        assert!(v < 90.0 && v > 89.99);
    }

    #[test]
    fn test_rng_source_bounds() {
        let mut r = RngSource::seeded(7);
        for _ in 0..1000 {
            let v = r.uniform(-7.5, 7.5);
            assert!((-7.5..7.5).contains(&v));
        }
        assert_eq!(r.uniform(3.0, 3.0), 3.0);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let mut a = RngSource::seeded(42);
        let mut b = RngSource::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.uniform(0.0, 1.0), b.uniform(0.0, 1.0));
        }
    }
}
