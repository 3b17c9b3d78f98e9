//! The Monte Carlo integration engines.
pub mod replicate;
