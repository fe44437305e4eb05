//! STL (Seasonal-Trend decomposition using LOESS) kernel.
//!
//! The kernel alternates two loops (Cleveland et al. 1990):
//! - Inner loop: for each seasonal spec, detrend and extract the seasonal
//!   component with its [`SeasonalFilter`]; then smooth the seasonally
//!   adjusted series into the trend.
//! - Outer loop: recompute robustness weights from the residuals of the fit
//!   and run the inner loop again with them.
//!
//! Every combination goes through the configured [`Composition`], so additive and
//! multiplicative decompositions share the same code. Several seasonal specs
//! give the multi-frequency variant.

use tracing::{debug, instrument, trace, warn};

use super::composition::Composition;
use super::result::{Decomposition, SeasonalComponent};
use super::robustness::update_weights;
use super::seasonal_filter::SeasonalFilter;
use super::spec::StlSpec;
use crate::error::{Result, StlError};
use crate::loess::{DataWindow, DataWindowMut, LoessFilter};

/// Decompose `series` according to `spec`.
pub fn decompose(series: &[f64], spec: &StlSpec) -> Result<Decomposition> {
    StlKernel::new(spec.clone()).decompose(series)
}

/// Reusable decomposition engine for one [`StlSpec`].
///
/// The kernel holds no per-run state; each call to
/// [`decompose`](StlKernel::decompose) allocates its own buffers, so a kernel
/// can be shared between threads.
#[derive(Debug, Clone)]
pub struct StlKernel {
    spec: StlSpec,
    trend: LoessFilter,
    seasonal: Vec<SeasonalFilter>,
}

/// Working arrays of one run.
struct Buffers {
    y: Vec<f64>,
    trend: Vec<f64>,
    seasons: Vec<Vec<f64>>,
    seasonal: Vec<f64>,
    sa: Vec<f64>,
    si: Vec<f64>,
    fit: Vec<f64>,
    weights: Vec<f64>,
}

impl Buffers {
    fn new(series: &[f64], components: usize, composition: Composition) -> Self {
        let n = series.len();
        let neutral = composition.neutral();
        Self {
            y: series.to_vec(),
            trend: vec![neutral; n],
            seasons: vec![vec![neutral; n]; components],
            seasonal: vec![neutral; n],
            sa: vec![0.0; n],
            si: vec![0.0; n],
            fit: vec![neutral; n],
            weights: vec![1.0; n],
        }
    }
}

impl StlKernel {
    pub fn new(spec: StlSpec) -> Self {
        let trend = LoessFilter::new(*spec.trend());
        let seasonal = spec.seasons().iter().map(SeasonalFilter::new).collect();
        Self {
            spec,
            trend,
            seasonal,
        }
    }

    pub fn spec(&self) -> &StlSpec {
        &self.spec
    }

    /// Decompose the series. Missing observations are NaN (or any non-finite
    /// value).
    #[instrument(
        skip_all,
        fields(n = series.len(), periods = ?self.spec.periods(), multiplicative = self.spec.is_multiplicative())
    )]
    pub fn decompose(&self, series: &[f64]) -> Result<Decomposition> {
        let n = series.len();
        if n == 0 {
            return Err(StlError::EmptyData);
        }
        let needed = 2 * self.spec.max_period();
        if n < needed {
            return Err(StlError::InsufficientData { needed, got: n });
        }

        let composition = self.spec.composition();
        let outer = self.spec.outer_loops();
        debug!(
            inner = self.spec.inner_loops(),
            outer,
            trend_window = self.spec.trend().window(),
            "starting decomposition"
        );

        let mut b = Buffers::new(series, self.seasonal.len(), composition);
        for iteration in 0..=outer {
            debug!(iteration, "outer iteration");
            self.inner_loop(&mut b)?;
            if iteration < outer {
                let scale = update_weights(
                    &b.y,
                    &b.fit,
                    composition,
                    self.spec.robust_weight_function(),
                    self.spec.robust_threshold(),
                    &mut b.weights,
                );
                if scale == 0.0 {
                    warn!(iteration, "robust scale is zero; only exact fits keep weight");
                }
                trace!(iteration, scale, "robustness weights updated");
            }
        }

        let seasons = self
            .seasonal
            .iter()
            .zip(b.seasons)
            .map(|(filter, values)| SeasonalComponent::new(filter.period(), values))
            .collect();
        let decomposition = Decomposition::assemble(composition, b.y, b.trend, seasons, b.weights);
        debug!("decomposition finished");
        Ok(decomposition)
    }

    /// Run the configured number of seasonal/trend passes.
    fn inner_loop(&self, b: &mut Buffers) -> Result<()> {
        let op = self.spec.composition();
        let n = b.y.len();

        for _ in 0..self.spec.inner_loops() {
            for (s, filter) in self.seasonal.iter().enumerate() {
                // detrend, then remove the other components' latest estimates
                for i in 0..n {
                    let mut v = op.invop(b.y[i], b.trend[i]);
                    for (k, season) in b.seasons.iter().enumerate() {
                        if k != s {
                            v = op.invop(v, season[i]);
                        }
                    }
                    b.si[i] = v;
                }
                if !filter.filter(&b.si, Some(&b.weights), op, &mut b.seasons[s]) {
                    return Err(StlError::UnsupportedRange { stage: "seasonal" });
                }
            }

            for i in 0..n {
                let total = b
                    .seasons
                    .iter()
                    .fold(op.neutral(), |acc, season| op.op(acc, season[i]));
                b.seasonal[i] = total;
                b.sa[i] = op.invop(b.y[i], total);
            }

            if !self.trend.filter(
                &DataWindow::new(&b.sa),
                Some(&DataWindow::new(&b.weights)),
                &mut DataWindowMut::new(&mut b.trend),
            ) {
                return Err(StlError::UnsupportedRange { stage: "trend" });
            }

            for i in 0..n {
                b.fit[i] = op.op(b.trend[i], b.seasonal[i]);
            }
        }
        Ok(())
    }
}
