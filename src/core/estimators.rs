//! This module contains everything related to estimators.
use num_traits::{Float, FromPrimitive};
use serde::{Deserialize, Serialize};

/// Basic estimators, like the mean.
pub trait BasicEstimators<T: Float> {
    /// Returns the mean value.
    fn mean(&self) -> T;
}

/// Running accumulator of integrand values for a single worker.
///
/// A worker folds every one of its integrand calls into this struct and
/// reports the resulting mean as its partial result. The accumulation is
/// branch-free: non-finite values are summed like any other, so a divergent
/// integrand poisons the estimate instead of being silently dropped.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PartialMean<T> {
    sum: T,
    calls: usize,
}

impl<T: Float> Default for PartialMean<T> {
    fn default() -> Self {
        Self {
            sum: T::zero(),
            calls: 0,
        }
    }
}

impl<T: Float> PartialMean<T> {
    /// Fold one integrand value into the accumulator.
    pub fn accumulate(&mut self, value: T) {
        self.sum = self.sum + value;
        self.calls += 1;
    }

    /// Returns the number of values folded in so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl<T> BasicEstimators<T> for PartialMean<T>
where
    T: Float + FromPrimitive,
{
    fn mean(&self) -> T {
        // TODO: Get rid of unwrap.
        self.sum / T::from_usize(self.calls).unwrap()
    }
}

/// Combine the per-worker partial means into the run's combined mean.
///
/// The unweighted arithmetic mean is only an unbiased combination because
/// every worker computes its partial mean over the same call budget (the
/// replicate policy of [`crate::core::plan`]). A variant with unequal
/// per-worker budgets would have to weight each partial by its call count.
///
/// Non-finite partials propagate through the mean; nothing is filtered.
pub fn reduce<T>(partials: &[PartialMean<T>]) -> T
where
    T: Float + FromPrimitive,
{
    debug_assert!(!partials.is_empty());

    let sum = partials
        .iter()
        .fold(T::zero(), |acc, p| acc + p.mean());
    // TODO: Get rid of unwrap.
    sum / T::from_usize(partials.len()).unwrap()
}
