#![warn(clippy::all, clippy::cargo, clippy::nursery, clippy::pedantic)]
#![warn(missing_docs)]

//! The crate `mcquad` estimates one-dimensional definite [integrals] with
//! plain [Monte Carlo integration], spreading the work over a fork-join pool
//! of independent workers.
//!
//! # Features
//!
//! This library was designed with the following features as essential in
//! mind:
//!
//! - **Generic numeric type**. The numeric type used in this library is not
//! fixed, but instead a generic parameter, so that the integration routines
//! can be used with either `f32`, `f64`, or a custom numeric type that
//! implements the `Float` trait from the `num-traits` crate.
//! - **Generic random number generator**. Every random number generator that
//! implements the `Rng` and `SeedableRng` traits from the `rand` crate can
//! be used with the engine.
//! - **Reproducibility**. Results depend only on the sample budget, the
//! worker count and the run-level seed; never on scheduling. Every worker
//! owns a private generator whose seed is derived from the run seed and the
//! worker index, so no generator state is ever shared between threads.
//! - **Replicate-N partitioning**. Each of the `W` workers draws its own
//! full-size sample stream of `N` samples and the estimate averages the `W`
//! resulting means. Total work is `W * N` by design; the payoff is an extra
//! `1/W` variance reduction on top of the base `1/N`.
//! - **No non-finite filtering**. Integrand values such as `inf` or `NaN`
//! are folded into the estimate like any other value. The hot loop carries
//! no per-sample branching; an integrand that diverges inside its domain
//! produces a non-finite estimate rather than an error.
//!
//! # What is ...?
//!
//! Given a function $f$ and an interval $[a, b]$ we approximate
//!
//! $$ I = \int_a^b \mathrm{d} x \, f(x) \approx \frac{b - a}{N}
//! \sum_{j=1}^N f \left( x^{(j)} \right) $$
//!
//! where the $x^{(j)}$ are uniformly distributed in $[a, b]$. We use the
//! following terms:
//!
//! - the *sample budget*, $N$, is the number of integrand calls per worker;
//! - the *integrand* is the function $f$ being integrated, together with its
//! native domain $[a, b]$;
//! - a *partial mean* is the mean of the integrand values one worker
//! computed over its own sample stream, before cross-worker combination;
//! - the *estimate* is the combined, domain-scaled approximation of $I$.
//!
//! [Monte Carlo integration]: https://en.wikipedia.org/wiki/Monte_Carlo_integration
//! [integrals]: https://en.wikipedia.org/wiki/Integral

pub mod core;
pub mod integrators;
pub mod registry;
pub mod sampler;

pub use crate::core::*;
