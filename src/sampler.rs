//! Uniform sampling over an interval.
//!
//! The single general-purpose primitive here is [`map_interval`], an affine
//! remap between two intervals. Sampling is that remap applied to raw draws
//! from the generator's native unit interval.

use crate::core::Interval;
use num_traits::Float;
use rand::distributions::{Distribution, Standard};
use rand::Rng;

/// Affinely remap `x` from the interval `from` into the interval `to`,
/// preserving its relative position.
///
/// Both intervals must be non-degenerate; [`Interval`] enforces this at
/// construction, so the division by `from.width()` is always well defined.
pub fn map_interval<T: Float>(x: T, from: &Interval<T>, to: &Interval<T>) -> T {
    (x - from.low()) / from.width() * to.width() + to.low()
}

/// Draw `count` independent uniform samples from `interval`.
///
/// Raw draws come from the generator's native unit interval `[0, 1)` and are
/// pushed through [`map_interval`] into the destination. `count == 0` yields
/// an empty vector without touching the generator.
pub fn uniform_sample<T, R>(interval: &Interval<T>, rng: &mut R, count: usize) -> Vec<T>
where
    T: Float,
    R: Rng,
    Standard: Distribution<T>,
{
    let unit = Interval::unit();

    (0..count)
        .map(|_| map_interval(rng.gen::<T>(), &unit, interval))
        .collect()
}
