//! The fixed registry of built-in integrands.
//!
//! The registry is a compile-time enumeration looked up once per run by
//! integer id; the engine itself only ever sees the [`Integrand`] trait
//! object it hands out. Adding an integrand means adding a type here and a
//! line to [`registry`] — the engine is untouched.

use crate::core::{Error, Integrand, Interval};
use num_traits::Float;

/// The integrand `f(x) = 2 / sqrt(1 - x^2)` over `[0, 1]`.
///
/// Its definite integral over the domain is `2 * asin(1) = pi`, which makes
/// it a convenient convergence check. Note that it diverges at the upper
/// domain bound; a sample landing exactly on `1` produces an infinite value
/// that propagates through the estimate unfiltered.
pub struct InverseCircle;

impl<T: Float> Integrand<T> for InverseCircle {
    fn call(&self, x: T) -> T {
        let two = T::one() + T::one();
        two / (T::one() - x * x).sqrt()
    }

    fn domain(&self) -> Interval<T> {
        Interval::unit()
    }
}

/// All built-in integrands, indexed by id.
pub fn registry<T: Float>() -> Vec<Box<dyn Integrand<T>>> {
    vec![Box::new(InverseCircle)]
}

/// Look up the integrand with the given `id`.
///
/// # Errors
///
/// Returns [`Error::UnknownFunction`] if `id` is outside the registry.
pub fn lookup<T: Float>(id: usize) -> Result<Box<dyn Integrand<T>>, Error> {
    let mut entries = registry::<T>();

    if id >= entries.len() {
        return Err(Error::UnknownFunction {
            id,
            registry_size: entries.len(),
        });
    }

    Ok(entries.swap_remove(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_inverse_circle_values() {
        let f = InverseCircle;

        assert_approx_eq!(f.call(0.0), 2.0, 1e-15);
        assert_approx_eq!(f.call(0.6), 2.5, 1e-15);
    }

    #[test]
    fn test_inverse_circle_diverges_at_upper_bound() {
        let f = InverseCircle;

        assert!(!f.call(1.0).is_finite());
    }

    #[test]
    fn test_lookup_known_id() {
        assert!(lookup::<f64>(0).is_ok());
    }

    #[test]
    fn test_lookup_unknown_id() {
        match lookup::<f64>(17) {
            Err(Error::UnknownFunction { id, registry_size }) => {
                assert_eq!(id, 17);
                assert_eq!(registry_size, 1);
            }
            _ => panic!("expected an unknown-function error"),
        }
    }
}
