//! Utility functions for decomposition results.

pub mod stats;

pub use stats::{finite_variance, mean, variance};
