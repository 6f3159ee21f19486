//! Weighted and uniform selection shared by every random pick in a possession.

use crate::sim::rng::RandomSource;

/// Cumulative-subtraction pick over non-negative weights.
///
/// Draws `r` in `[0, total)` and walks the weights subtracting each one; the
/// first index that brings the running value to `<= 0` wins. Rounding can
/// leave the walk without a winner, in which case `fallback` is returned.
pub fn pick_weighted<R: RandomSource + ?Sized>(
    weights: &[f64],
    fallback: usize,
    rng: &mut R,
) -> usize {
    let total: f64 = weights.iter().sum();
    let mut remaining = rng.next_f64() * total;
    for (index, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining <= 0.0 {
            return index;
        }
    }
    fallback
}

/// Uniform index in `0..len`. `len` must be non-zero.
pub fn pick_uniform<R: RandomSource + ?Sized>(len: usize, rng: &mut R) -> usize {
    debug_assert!(len > 0, "pick_uniform on empty range");
    ((rng.next_f64() * len as f64) as usize).min(len.saturating_sub(1))
}

/// Draw in `[0, 100)`; the percentage scale every roll in the engine uses.
#[inline]
pub fn roll_percent<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    rng.next_f64() * 100.0
}
