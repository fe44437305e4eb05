//! Decomposition results.

use super::composition::Composition;
use crate::utils::stats::finite_variance;

/// One estimated seasonal component.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalComponent {
    period: usize,
    values: Vec<f64>,
}

impl SeasonalComponent {
    pub(crate) fn new(period: usize, values: Vec<f64>) -> Self {
        Self { period, values }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Result of an STL decomposition.
///
/// All arrays are index-aligned with the input series and satisfy, with `⊕`
/// the composition operator:
/// - `seasonal = ⊕ seasons`
/// - `fit = trend ⊕ seasonal`
/// - `series = fit ⊕ irregular` wherever the series is observed
/// - `sa = series ⊖ seasonal`
///
/// At missing observations the irregular is the neutral element.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    composition: Composition,
    series: Vec<f64>,
    trend: Vec<f64>,
    seasons: Vec<SeasonalComponent>,
    seasonal: Vec<f64>,
    sa: Vec<f64>,
    irregular: Vec<f64>,
    fit: Vec<f64>,
    weights: Vec<f64>,
}

impl Decomposition {
    /// Derive the combined arrays from the estimated components.
    pub(crate) fn assemble(
        composition: Composition,
        series: Vec<f64>,
        trend: Vec<f64>,
        seasons: Vec<SeasonalComponent>,
        weights: Vec<f64>,
    ) -> Self {
        let n = series.len();
        let neutral = composition.neutral();

        let mut seasonal = vec![neutral; n];
        for component in &seasons {
            for (total, s) in seasonal.iter_mut().zip(&component.values) {
                *total = composition.op(*total, *s);
            }
        }

        let fit: Vec<f64> = trend
            .iter()
            .zip(&seasonal)
            .map(|(t, s)| composition.op(*t, *s))
            .collect();
        let sa: Vec<f64> = series
            .iter()
            .zip(&seasonal)
            .map(|(y, s)| composition.invop(*y, *s))
            .collect();
        let irregular: Vec<f64> = series
            .iter()
            .zip(&fit)
            .map(|(y, f)| {
                if y.is_finite() {
                    composition.invop(*y, *f)
                } else {
                    neutral
                }
            })
            .collect();

        Self {
            composition,
            series,
            trend,
            seasons,
            seasonal,
            sa,
            irregular,
            fit,
            weights,
        }
    }

    pub fn composition(&self) -> Composition {
        self.composition
    }

    pub fn is_multiplicative(&self) -> bool {
        self.composition.is_multiplicative()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The decomposed series (missing values kept as given).
    pub fn series(&self) -> &[f64] {
        &self.series
    }

    pub fn trend(&self) -> &[f64] {
        &self.trend
    }

    /// Seasonal components in declared order.
    pub fn seasons(&self) -> &[SeasonalComponent] {
        &self.seasons
    }

    /// Seasonal component of the given period.
    pub fn season(&self, period: usize) -> Option<&[f64]> {
        self.seasons
            .iter()
            .find(|c| c.period == period)
            .map(|c| c.values.as_slice())
    }

    pub fn periods(&self) -> Vec<usize> {
        self.seasons.iter().map(|c| c.period).collect()
    }

    /// All seasonal components combined.
    pub fn seasonal(&self) -> &[f64] {
        &self.seasonal
    }

    /// Seasonally adjusted series.
    pub fn sa(&self) -> &[f64] {
        &self.sa
    }

    pub fn irregular(&self) -> &[f64] {
        &self.irregular
    }

    /// Trend combined with the seasonal components.
    pub fn fit(&self) -> &[f64] {
        &self.fit
    }

    /// Robustness weights of the last outer iteration (all 1 when the
    /// decomposition ran without robustness iterations).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Trend strength in [0, 1]; values close to 1 indicate a strong trend.
    pub fn trend_strength(&self) -> f64 {
        self.strength(&self.trend)
    }

    /// Seasonal strength in [0, 1] of the component with the given period.
    pub fn seasonal_strength(&self, period: usize) -> Option<f64> {
        self.season(period).map(|s| self.strength(s))
    }

    /// `1 - var(irregular) / var(component ⊕ irregular)`, clamped to [0, 1].
    fn strength(&self, component: &[f64]) -> f64 {
        let var_irregular = finite_variance(&self.irregular);
        let combined: Vec<f64> = component
            .iter()
            .zip(&self.irregular)
            .map(|(c, r)| self.composition.op(*c, *r))
            .collect();
        let var_combined = finite_variance(&combined);

        if !(var_combined >= 1e-10) || !var_irregular.is_finite() {
            return 0.0;
        }
        (1.0 - var_irregular / var_combined).clamp(0.0, 1.0)
    }
}
