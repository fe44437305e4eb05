//! Declarative configuration of STL decompositions.

use std::collections::HashSet;

use super::composition::Composition;
use crate::error::{Result, StlError};
use crate::loess::{default_jump, next_odd, LoessSpec, WeightFunction};

/// Seasonal window used by [`SeasonalSpec::periodic`]. Wide enough that
/// every cycle-subseries reduces to a (nearly uniform) weighted mean.
///
/// The matching default jump (10 001) exceeds any subseries, so the smoother
/// fits only the two ends of each subseries and interpolates linearly in
/// between. With degree 0 both ends carry the same near-uniform mean and the
/// result is flat; a degree-1 smoother here would give a sloped line instead.
const PERIODIC_WINDOW: usize = 100_001;

/// Smoothers for one seasonal frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalSpec {
    period: usize,
    seasonal: LoessSpec,
    low_pass: LoessSpec,
}

impl SeasonalSpec {
    /// Degree-0 cycle-subseries smoother of odd width `seasonal_window`, and
    /// the default low-pass smoother (window `period + 1`, degree 1).
    pub fn new(period: usize, seasonal_window: usize) -> Result<Self> {
        check_period(period)?;
        let seasonal = LoessSpec::new(seasonal_window, 0)?;
        Self::with_filters(period, seasonal, default_low_pass(period)?)
    }

    /// Seasonal pattern held fixed across cycles: a degree-0 smoother over a
    /// window wider than any cycle-subseries.
    pub fn periodic(period: usize) -> Result<Self> {
        check_period(period)?;
        let seasonal = LoessSpec::of(
            PERIODIC_WINDOW,
            0,
            default_jump(PERIODIC_WINDOW),
            WeightFunction::Tricube,
        )?;
        Self::with_filters(period, seasonal, default_low_pass(period)?)
    }

    pub fn with_filters(period: usize, seasonal: LoessSpec, low_pass: LoessSpec) -> Result<Self> {
        check_period(period)?;
        Ok(Self {
            period,
            seasonal,
            low_pass,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn seasonal(&self) -> &LoessSpec {
        &self.seasonal
    }

    pub fn low_pass(&self) -> &LoessSpec {
        &self.low_pass
    }
}

fn check_period(period: usize) -> Result<()> {
    if period == 0 {
        Err(StlError::InvalidPeriod(period))
    } else {
        Ok(())
    }
}

fn default_low_pass(period: usize) -> Result<LoessSpec> {
    let window = period + 1;
    LoessSpec::of(window, 1, default_jump(window), WeightFunction::Tricube)
}

/// Complete decomposition configuration.
///
/// A single seasonal spec gives classical STL; several give the
/// multi-frequency variant, with components estimated in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct StlSpec {
    composition: Composition,
    trend: LoessSpec,
    seasons: Vec<SeasonalSpec>,
    inner_loops: usize,
    outer_loops: usize,
    robust_weight_function: WeightFunction,
    robust_threshold: f64,
}

impl StlSpec {
    pub fn builder() -> StlSpecBuilder {
        StlSpecBuilder::new()
    }

    /// Additive, non-robust STL for one period.
    pub fn for_period(period: usize, seasonal_window: usize) -> Result<Self> {
        Self::builder()
            .with_season(SeasonalSpec::new(period, seasonal_window)?)
            .build()
    }

    /// Additive robust STL for one period: one inner pass, fifteen
    /// robustness iterations.
    pub fn robust_for_period(period: usize, seasonal_window: usize) -> Result<Self> {
        Self::builder()
            .with_season(SeasonalSpec::new(period, seasonal_window)?)
            .with_inner_loops(1)
            .with_outer_loops(15)
            .build()
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    pub fn is_multiplicative(&self) -> bool {
        self.composition.is_multiplicative()
    }

    pub fn trend(&self) -> &LoessSpec {
        &self.trend
    }

    pub fn seasons(&self) -> &[SeasonalSpec] {
        &self.seasons
    }

    pub fn periods(&self) -> Vec<usize> {
        self.seasons.iter().map(|s| s.period).collect()
    }

    /// Longest declared period.
    pub fn max_period(&self) -> usize {
        self.seasons.iter().map(|s| s.period).max().unwrap_or(0)
    }

    pub fn inner_loops(&self) -> usize {
        self.inner_loops
    }

    pub fn outer_loops(&self) -> usize {
        self.outer_loops
    }

    pub fn robust_weight_function(&self) -> WeightFunction {
        self.robust_weight_function
    }

    pub fn robust_threshold(&self) -> f64 {
        self.robust_threshold
    }
}

/// Builder for [`StlSpec`].
#[derive(Debug, Clone)]
pub struct StlSpecBuilder {
    composition: Composition,
    trend: Option<LoessSpec>,
    seasons: Vec<SeasonalSpec>,
    inner_loops: usize,
    outer_loops: usize,
    robust_weight_function: WeightFunction,
    robust_threshold: f64,
}

impl Default for StlSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StlSpecBuilder {
    pub fn new() -> Self {
        Self {
            composition: Composition::Additive,
            trend: None,
            seasons: Vec::new(),
            inner_loops: 2,
            outer_loops: 0,
            robust_weight_function: WeightFunction::Biweight,
            robust_threshold: 0.001,
        }
    }

    /// Append a seasonal component.
    pub fn with_season(mut self, season: SeasonalSpec) -> Self {
        self.seasons.push(season);
        self
    }

    /// Set the trend smoother; defaults to Cleveland's rule on the longest period.
    pub fn with_trend(mut self, trend: LoessSpec) -> Self {
        self.trend = Some(trend);
        self
    }

    pub fn multiplicative(mut self, multiplicative: bool) -> Self {
        self.composition = Composition::from_multiplicative(multiplicative);
        self
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_inner_loops(mut self, n: usize) -> Self {
        self.inner_loops = n;
        self
    }

    pub fn with_outer_loops(mut self, n: usize) -> Self {
        self.outer_loops = n;
        self
    }

    pub fn with_robust_weight_function(mut self, function: WeightFunction) -> Self {
        self.robust_weight_function = function;
        self
    }

    pub fn with_robust_threshold(mut self, threshold: f64) -> Self {
        self.robust_threshold = threshold;
        self
    }

    pub fn build(self) -> Result<StlSpec> {
        if self.seasons.is_empty() {
            return Err(StlError::NoSeasonalSpec);
        }
        let mut seen = HashSet::new();
        for season in &self.seasons {
            if !seen.insert(season.period) {
                return Err(StlError::DuplicatePeriod(season.period));
            }
        }
        if self.inner_loops == 0 {
            return Err(StlError::InvalidLoopCount(
                "inner loop count must be at least 1".to_string(),
            ));
        }
        if !(self.robust_threshold > 0.0 && self.robust_threshold < 1.0) {
            return Err(StlError::InvalidThreshold(self.robust_threshold));
        }
        self.robust_weight_function.validate()?;

        let trend = match self.trend {
            Some(trend) => trend,
            None => default_trend(&self.seasons)?,
        };

        Ok(StlSpec {
            composition: self.composition,
            trend,
            seasons: self.seasons,
            inner_loops: self.inner_loops,
            outer_loops: self.outer_loops,
            robust_weight_function: self.robust_weight_function,
            robust_threshold: self.robust_threshold,
        })
    }
}

/// `nextodd(ceil(1.5 * np / (1 - 1.5 / ns)))` for the longest period.
fn default_trend(seasons: &[SeasonalSpec]) -> Result<LoessSpec> {
    let longest = seasons
        .iter()
        .max_by_key(|s| s.period)
        .ok_or(StlError::NoSeasonalSpec)?;
    let np = longest.period as f64;
    let ns = longest.seasonal.window() as f64;
    let window = (1.5 * np / (1.0 - 1.5 / ns)).ceil() as usize;
    LoessSpec::new(next_odd(window.max(3)), 1)
}
