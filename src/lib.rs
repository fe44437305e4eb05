//! # seasonal-stl
//!
//! Seasonal-trend decomposition of time series using Loess (STL).
//!
//! Provides a configurable Loess smoother over strided data windows, the
//! seasonal and low-pass filters built on it, and the robust STL kernel
//! with additive or multiplicative composition and any number of seasonal
//! periods.
//!
//! ```
//! use seasonal_stl::prelude::*;
//!
//! let series: Vec<f64> = (0..48)
//!     .map(|i| i as f64 + [2.0, -1.0, 0.5, -1.5][i % 4])
//!     .collect();
//! let spec = StlSpec::for_period(4, 7)?;
//! let result = decompose(&series, &spec)?;
//! assert_eq!(result.trend().len(), series.len());
//! # Ok::<(), StlError>(())
//! ```

#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod loess;
pub mod seasonality;
pub mod utils;

pub use error::{Result, StlError};

pub mod prelude {
    pub use crate::error::{Result, StlError};
    pub use crate::loess::{LoessFilter, LoessSpec, WeightFunction};
    pub use crate::seasonality::{
        decompose, decompose_iterative, Composition, Decomposition, IterativeStl, SeasonalSpec,
        StlKernel, StlSpec,
    };
}
