//! Local regression (Loess) smoothing.
//!
//! - [`LoessSpec`]: window, degree, jump and distance kernel of one smoother
//! - [`LoessFilter`]: applies a spec to a [`DataWindow`], extrapolating into
//!   a larger destination [`DataWindowMut`] when asked to

mod filter;
mod spec;
mod window;

pub use filter::LoessFilter;
pub use spec::{LoessSpec, WeightFunction};
pub use window::{DataWindow, DataWindowMut};

pub(crate) use filter::fill_gaps;
pub(crate) use spec::{default_jump, next_odd};
