//! Seasonal-trend decomposition.
//!
//! This module provides the STL machinery built on the Loess smoother:
//! - STL: Seasonal-Trend decomposition using LOESS, with one or several
//!   seasonal components sharing the inner and outer loops
//! - Iterative STL: one full STL run per frequency, chained through the
//!   seasonally adjusted series

mod composition;
mod mstl;
mod result;
mod robustness;
mod seasonal_filter;
mod spec;
mod stl;

pub use composition::Composition;
pub use mstl::{decompose_iterative, IterativeStl};
pub use result::{Decomposition, SeasonalComponent};
pub use seasonal_filter::SeasonalFilter;
pub use spec::{SeasonalSpec, StlSpec, StlSpecBuilder};
pub use stl::{decompose, StlKernel};
