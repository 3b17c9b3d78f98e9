//! The core module
pub mod estimators;

use num_traits::{Float, ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported by the integration engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller requested a run with zero workers.
    #[error("at least one worker is required")]
    InvalidWorkerCount,
    /// The requested integrand id is not present in the registry.
    #[error("no integrand with id {id}, valid ids are 0..{registry_size}")]
    UnknownFunction {
        /// The id that was looked up.
        id: usize,
        /// The number of entries in the registry.
        registry_size: usize,
    },
    /// A worker thread terminated abnormally. Fatal to the whole run; the
    /// engine does not retry or degrade to fewer workers.
    #[error("worker {worker_id} terminated abnormally")]
    WorkerPanicked {
        /// Zero-based id of the worker that died.
        worker_id: usize,
    },
    /// An interval with `low >= high` was requested.
    #[error("interval [{low}, {high}] is empty")]
    EmptyInterval {
        /// Requested lower bound.
        low: f64,
        /// Requested upper bound.
        high: f64,
    },
}

/// A non-degenerate interval on the real line.
///
/// Used both as an integration domain and as the target of the affine remap
/// in [`crate::sampler`]. The constructor rejects `low >= high`, so a
/// degenerate interval can never reach the remap's division.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Interval<T> {
    low: T,
    high: T,
}

impl<T: Float> Interval<T> {
    /// Construct the interval from `low` (inclusive) to `high`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInterval`] unless `low < high`.
    pub fn new(low: T, high: T) -> Result<Self, Error> {
        if low < high {
            Ok(Self { low, high })
        } else {
            Err(Error::EmptyInterval {
                low: low.to_f64().unwrap_or(f64::NAN),
                high: high.to_f64().unwrap_or(f64::NAN),
            })
        }
    }

    /// The unit interval `[0, 1]`, the native range of the raw generator
    /// draws.
    pub fn unit() -> Self {
        Self {
            low: T::zero(),
            high: T::one(),
        }
    }

    /// Returns the lower bound.
    pub fn low(&self) -> T {
        self.low
    }

    /// Returns the upper bound.
    pub fn high(&self) -> T {
        self.high
    }

    /// Returns the measure `high - low` of the interval.
    pub fn width(&self) -> T {
        self.high - self.low
    }
}

/// Integrand trait
///
/// An integrand is a real function of one variable together with its native
/// integration domain. Implementations must be callable from multiple worker
/// threads at once.
pub trait Integrand<T: Copy>: Send + Sync {
    /// Evaluate the integrand at the point `x`.
    ///
    /// The engine calls this once per sample with `x` drawn from
    /// [`Integrand::domain`]. Evaluation must be total over the domain;
    /// non-finite return values are not filtered and propagate into the
    /// estimate per IEEE arithmetic.
    fn call(&self, x: T) -> T;

    /// The domain the integrand is integrated over.
    fn domain(&self) -> Interval<T>;
}

/// One worker's share of a run: its id, the number of integrand calls it
/// performs and the seed of its privately owned generator.
///
/// Created by [`plan`], consumed by exactly one worker.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct WorkAssignment {
    worker_id: usize,
    calls: usize,
    seed: u64,
}

impl WorkAssignment {
    /// Zero-based id of the worker this assignment belongs to.
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Number of integrand calls the worker performs.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Seed of the worker's private generator.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Build the per-worker assignments for a run of `calls` integrand calls on
/// `workers` workers, deriving every worker's generator seed from the
/// run-level `seed`.
///
/// The engine replicates the full call budget to every worker: each of the
/// `workers` assignments carries all `calls` calls, and the final estimate
/// averages the per-worker means. Total work therefore scales with
/// `workers * calls`, buying an extra `1/W` variance reduction on top of the
/// base `1/N`. This replication is the documented partition policy, not an
/// even split of `calls`.
///
/// # Errors
///
/// Returns [`Error::InvalidWorkerCount`] if `workers` is zero. The check
/// happens before any allocation.
pub fn plan(calls: usize, workers: usize, seed: u64) -> Result<Vec<WorkAssignment>, Error> {
    if workers == 0 {
        return Err(Error::InvalidWorkerCount);
    }

    Ok((0..workers)
        .map(|worker_id| WorkAssignment {
            worker_id,
            calls,
            seed: worker_seed(seed, worker_id),
        })
        .collect())
}

/// Derive the seed of the private generator of worker `worker_id` from the
/// run-level seed.
///
/// Every worker owns its own generator instead of sharing a process-wide
/// one, so worker streams stay independent and reproducible regardless of
/// scheduling. The mixing is the splitmix64 finalizer, which keeps seeds
/// pairwise distinct even for adjacent worker ids.
pub(crate) fn worker_seed(seed: u64, worker_id: usize) -> u64 {
    let mut z = seed.wrapping_add((worker_id as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Everything a finished run hands back to the caller.
///
/// The engine keeps no module-level state: the estimate, the per-worker
/// partial means and (if requested) the raw per-worker sample buffers are
/// all owned by this struct, and the caller decides whether to print,
/// serialize or drop them.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RunOutcome<T> {
    estimate: T,
    partial_means: Vec<T>,
    samples: Option<Vec<Vec<T>>>,
}

impl<T: Copy> RunOutcome<T> {
    pub(crate) fn new(estimate: T, partial_means: Vec<T>, samples: Option<Vec<Vec<T>>>) -> Self {
        Self {
            estimate,
            partial_means,
            samples,
        }
    }

    /// The final integral estimate.
    pub fn estimate(&self) -> T {
        self.estimate
    }

    /// The partial mean each worker reported, indexed by worker id.
    pub fn partial_means(&self) -> &[T] {
        &self.partial_means
    }

    /// The raw sample buffer of each worker, if the run was asked to retain
    /// them.
    pub fn samples(&self) -> Option<&[Vec<T>]> {
        self.samples.as_deref()
    }

    /// Destructure the outcome and return its components.
    pub fn destructure(self) -> (T, Vec<T>, Option<Vec<Vec<T>>>) {
        (self.estimate, self.partial_means, self.samples)
    }
}
