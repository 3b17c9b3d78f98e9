//! Fork-join engine with the replicate-N partition policy.
//!
//! Every worker draws its own full-size sample stream from a privately owned
//! generator, folds the integrand values into a partial mean and reports it;
//! after all workers have joined, the partial means are averaged into the
//! final estimate. A run with a single worker never spawns a thread.

use crate::core::estimators::{reduce, BasicEstimators, PartialMean};
use crate::core::{plan, Error, Integrand, RunOutcome, WorkAssignment};
use crate::sampler::uniform_sample;

use crossbeam as cb;
use log::debug;
use num_traits::{Float, FromPrimitive};
use rand::distributions::{Distribution, Standard};
use rand::{Rng, SeedableRng};

/// Run one assignment to completion: sample, evaluate, accumulate.
///
/// The generator is constructed from the assignment's seed, so the worker
/// shares no state with any other worker. The accumulation loop carries no
/// per-sample branching; non-finite integrand values flow straight into the
/// partial mean.
fn integrate_assignment<T, R, I>(
    integrand: &I,
    assignment: &WorkAssignment,
    keep_samples: bool,
) -> (PartialMean<T>, Option<Vec<T>>)
where
    I: Integrand<T> + ?Sized,
    T: Float,
    R: Rng + SeedableRng,
    Standard: Distribution<T>,
{
    let mut rng = R::seed_from_u64(assignment.seed());
    let samples = uniform_sample(&integrand.domain(), &mut rng, assignment.calls());

    let mut acc = PartialMean::default();
    for &x in &samples {
        acc.accumulate(integrand.call(x));
    }

    let samples = if keep_samples { Some(samples) } else { None };
    (acc, samples)
}

/// Spawn one thread per assignment, wait for all of them and collect the
/// results in worker order.
fn fork_join<T, R, I>(
    integrand: &I,
    assignments: &[WorkAssignment],
    keep_samples: bool,
) -> Result<Vec<(PartialMean<T>, Option<Vec<T>>)>, Error>
where
    I: Integrand<T> + ?Sized,
    T: Float + Send,
    R: Rng + SeedableRng,
    Standard: Distribution<T>,
{
    cb::thread::scope(|s| {
        let mut handles = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            handles.push(s.spawn(move |_| {
                integrate_assignment::<T, R, I>(integrand, assignment, keep_samples)
            }));
        }

        // full barrier: the reducer must not see a partial set of results
        handles
            .into_iter()
            .enumerate()
            .map(|(worker_id, handle)| {
                handle.join().map_err(|_| Error::WorkerPanicked { worker_id })
            })
            .collect::<Result<Vec<_>, _>>()
    })
    // every handle is joined above, so the scope itself cannot fail with a
    // worker panic on its hands
    .map_err(|_| Error::WorkerPanicked { worker_id: 0 })?
}

/// Integrate `integrand` with `workers` workers of `calls` integrand calls
/// each, deriving all randomness from the run-level `seed`.
///
/// Per the replicate policy (see [`plan`]), every worker draws its own
/// `calls` samples over the integrand's domain and the estimate is the mean
/// of the per-worker means, scaled by the domain measure. With
/// `keep_samples` set, the raw per-worker sample buffers are retained in the
/// returned [`RunOutcome`] for diagnostics.
///
/// A single-worker run stays on the calling thread; no threads are spawned.
/// Results are reproducible: they depend only on `calls`, `workers` and
/// `seed`, never on scheduling.
///
/// # Errors
///
/// Returns [`Error::InvalidWorkerCount`] for `workers == 0` and
/// [`Error::WorkerPanicked`] if a worker thread dies. A worker failure is
/// fatal to the whole run; nothing is retried.
pub fn integrate<T, R, I>(
    integrand: &I,
    calls: usize,
    workers: usize,
    seed: u64,
    keep_samples: bool,
) -> Result<RunOutcome<T>, Error>
where
    I: Integrand<T> + ?Sized,
    T: Float + FromPrimitive + Send,
    R: Rng + SeedableRng,
    Standard: Distribution<T>,
{
    let assignments = plan(calls, workers, seed)?;

    let results = if workers == 1 {
        debug!("single worker requested, running on the calling thread");
        vec![integrate_assignment::<T, R, I>(
            integrand,
            &assignments[0],
            keep_samples,
        )]
    } else {
        debug!("forking {} workers with {} calls each", workers, calls);
        fork_join::<T, R, I>(integrand, &assignments, keep_samples)?
    };

    let mut partials = Vec::with_capacity(results.len());
    let mut buffers = Vec::with_capacity(results.len());
    for (partial, samples) in results {
        partials.push(partial);
        if let Some(samples) = samples {
            buffers.push(samples);
        }
    }

    let estimate = integrand.domain().width() * reduce(&partials);
    let partial_means = partials.iter().map(BasicEstimators::mean).collect();
    let buffers = if keep_samples { Some(buffers) } else { None };

    Ok(RunOutcome::new(estimate, partial_means, buffers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Interval;
    use crate::registry::InverseCircle;
    use assert_approx_eq::assert_approx_eq;
    use rand_pcg::Pcg64;

    #[test]
    fn test_sequential_fallback_matches_single_worker_fork_join() {
        let integrand = InverseCircle;
        let seed = 0xdead_beef;

        // the public entry point takes the inline path for one worker
        let sequential =
            integrate::<f64, Pcg64, _>(&integrand, 10_000, 1, seed, false).unwrap();

        // drive the same single assignment through the thread-spawning path
        let assignments = plan(10_000, 1, seed).unwrap();
        let forked = fork_join::<f64, Pcg64, _>(&integrand, &assignments, false).unwrap();

        assert_eq!(sequential.partial_means()[0], forked[0].0.mean());
    }

    #[test]
    fn test_single_worker_run_is_reproducible() {
        let integrand = InverseCircle;

        let first = integrate::<f64, Pcg64, _>(&integrand, 1000, 1, 42, false).unwrap();
        let second = integrate::<f64, Pcg64, _>(&integrand, 1000, 1, 42, false).unwrap();

        assert_eq!(first.estimate(), second.estimate());
    }

    #[test]
    fn test_parallel_run_is_reproducible() {
        let integrand = InverseCircle;

        let first = integrate::<f64, Pcg64, _>(&integrand, 1000, 4, 42, false).unwrap();
        let second = integrate::<f64, Pcg64, _>(&integrand, 1000, 4, 42, false).unwrap();

        assert_eq!(first.estimate(), second.estimate());
        assert_eq!(first.partial_means(), second.partial_means());
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        let integrand = InverseCircle;

        assert!(matches!(
            integrate::<f64, Pcg64, _>(&integrand, 1000, 0, 42, false),
            Err(Error::InvalidWorkerCount)
        ));
    }

    #[test]
    fn test_kept_samples_cover_every_worker() {
        let integrand = InverseCircle;

        let outcome = integrate::<f64, Pcg64, _>(&integrand, 100, 3, 7, true).unwrap();

        let buffers = outcome.samples().unwrap();
        assert_eq!(buffers.len(), 3);
        for buffer in buffers {
            assert_eq!(buffer.len(), 100);
            for &x in buffer {
                assert!((0.0..=1.0).contains(&x));
            }
        }
    }

    #[test]
    fn test_samples_dropped_by_default() {
        let integrand = InverseCircle;

        let outcome = integrate::<f64, Pcg64, _>(&integrand, 100, 2, 7, false).unwrap();

        assert!(outcome.samples().is_none());
    }

    #[test]
    fn test_workers_draw_distinct_streams() {
        let integrand = InverseCircle;

        let outcome = integrate::<f64, Pcg64, _>(&integrand, 1000, 2, 11, false).unwrap();

        assert_ne!(outcome.partial_means()[0], outcome.partial_means()[1]);
    }

    struct Diverging;

    impl Integrand<f64> for Diverging {
        fn call(&self, _: f64) -> f64 {
            f64::INFINITY
        }

        fn domain(&self) -> Interval<f64> {
            Interval::unit()
        }
    }

    #[test]
    fn test_non_finite_values_poison_the_estimate() {
        let outcome = integrate::<f64, Pcg64, _>(&Diverging, 100, 2, 5, false).unwrap();

        assert!(!outcome.estimate().is_finite());
    }

    #[test]
    fn test_estimate_scales_with_domain_width() {
        struct Constant;

        impl Integrand<f64> for Constant {
            fn call(&self, _: f64) -> f64 {
                1.5
            }

            fn domain(&self) -> Interval<f64> {
                Interval::new(0.0, 4.0).unwrap()
            }
        }

        // int_0^4 1.5 dx = 6, exactly, for any sample placement
        let outcome = integrate::<f64, Pcg64, _>(&Constant, 1000, 2, 3, false).unwrap();

        assert_approx_eq!(outcome.estimate(), 6.0, 1e-12);
    }
}
