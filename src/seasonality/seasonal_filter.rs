//! Extraction of one seasonal component.
//!
//! Each cycle-subseries (the values sharing a phase of the period) is
//! smoothed by the seasonal Loess filter and extended by one cycle at both
//! ends, filling a buffer `c` that covers logical indices `[-np, n + np)`.
//! The low-pass step (moving averages of length `np`, `np` and 3, then the
//! low-pass Loess filter) brings `c` back to length `n` and removes what
//! trend leaked into it; the seasonal component is `c ⊖ low-pass`.
//!
//! A phase with no observation carrying weight (all missing, or all
//! rejected by the robustness weights) cannot be smoothed; its slots in `c`
//! are copied from the adjacent phase of the same cycle.

use tracing::warn;

use super::composition::Composition;
use super::spec::SeasonalSpec;
use crate::loess::{fill_gaps, DataWindow, DataWindowMut, LoessFilter};

/// Seasonal and low-pass smoothers for one period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeasonalFilter {
    period: usize,
    seasonal: LoessFilter,
    low_pass: LoessFilter,
}

impl SeasonalFilter {
    pub fn new(spec: &SeasonalSpec) -> Self {
        Self {
            period: spec.period(),
            seasonal: LoessFilter::new(*spec.seasonal()),
            low_pass: LoessFilter::new(*spec.low_pass()),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Estimate the seasonal component of the detrended sequence `si` into
    /// `season` (same length). `weights` are robustness weights aligned with
    /// `si`.
    ///
    /// Returns `false` when the series is shorter than one period, when the
    /// slice lengths disagree, or when an inner filter declines its range.
    pub fn filter(
        &self,
        si: &[f64],
        weights: Option<&[f64]>,
        composition: Composition,
        season: &mut [f64],
    ) -> bool {
        let n = si.len();
        let np = self.period;
        if n == 0 || season.len() != n || weights.is_some_and(|w| w.len() != n) {
            return false;
        }

        let mut cycle = vec![0.0; n + 2 * np];
        for phase in 0..np {
            if phase >= n {
                return false;
            }
            let count = (n - phase).div_ceil(np) as isize;
            let source = DataWindow::strided(si, phase, np, 0, count);
            let rw = weights.map(|w| DataWindow::strided(w, phase, np, 0, count));
            // slot `phase` of `cycle` holds the subseries value at -1
            let mut dest = DataWindowMut::strided(&mut cycle, phase, np, -1, count + 1);
            if !self.seasonal.filter(&source, rw.as_ref(), &mut dest) {
                return false;
            }
        }

        let unobserved = cycle.iter().filter(|v| v.is_nan()).count();
        if unobserved > 0 {
            warn!(
                period = np,
                unobserved,
                "cycle-subseries without weighted observations filled from the adjacent phase"
            );
            fill_gaps(&mut DataWindowMut::new(&mut cycle));
        }

        let smoothed = low_pass_averages(&cycle, np);
        let mut low = vec![0.0; n];
        if !self.low_pass.filter(
            &DataWindow::new(&smoothed),
            None,
            &mut DataWindowMut::new(&mut low),
        ) {
            return false;
        }

        for (i, s) in season.iter_mut().enumerate() {
            *s = composition.invop(cycle[i + np], low[i]);
        }
        true
    }
}

/// Moving averages of length `np`, `np` and 3; shortens `x` by `2 * np`.
fn low_pass_averages(x: &[f64], np: usize) -> Vec<f64> {
    let first = moving_average(x, np);
    let second = moving_average(&first, np);
    moving_average(&second, 3)
}

fn moving_average(x: &[f64], len: usize) -> Vec<f64> {
    let scale = len as f64;
    x.windows(len)
        .map(|w| w.iter().sum::<f64>() / scale)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loess::{LoessSpec, WeightFunction};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn sine(n: usize, period: usize, amplitude: f64) -> Vec<f64> {
        (0..n)
            .map(|i| amplitude * (2.0 * PI * i as f64 / period as f64).sin())
            .collect()
    }

    fn linear_low_pass(period: usize) -> LoessSpec {
        LoessSpec::of(period + 1, 1, 2, WeightFunction::Tricube).unwrap()
    }

    #[test]
    fn moving_averages_shorten_by_two_periods() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let out = low_pass_averages(&x, 4);
        assert_eq!(out.len(), 22);
        // a linear input comes back shifted by one period
        for (i, v) in out.iter().enumerate() {
            assert_abs_diff_eq!(*v, (i + 4) as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn periodic_input_is_recovered() {
        let period = 12;
        let si: Vec<f64> = sine(120, period, 10.0).iter().map(|v| v + 5.0).collect();
        let filter = SeasonalFilter::new(&SeasonalSpec::new(period, 7).unwrap());
        let mut season = vec![0.0; 120];
        assert!(filter.filter(&si, None, Composition::Additive, &mut season));
        for (s, expected) in season.iter().zip(sine(120, period, 10.0)) {
            assert_abs_diff_eq!(*s, expected, epsilon = 1e-8);
        }
    }

    #[test]
    fn trend_leakage_is_removed() {
        let period = 12;
        let seasonal = sine(96, period, 3.0);
        let si: Vec<f64> = seasonal
            .iter()
            .enumerate()
            .map(|(i, s)| 2.0 + 0.25 * i as f64 + s)
            .collect();
        let spec =
            SeasonalSpec::with_filters(period, LoessSpec::new(7, 1).unwrap(), linear_low_pass(period))
                .unwrap();
        let mut season = vec![0.0; 96];
        assert!(SeasonalFilter::new(&spec).filter(&si, None, Composition::Additive, &mut season));
        for (s, expected) in season.iter().zip(seasonal) {
            assert_abs_diff_eq!(*s, expected, epsilon = 1e-7);
        }
    }

    #[test]
    fn multiplicative_component_is_centered_on_one() {
        let period = 4;
        let pattern = [1.1, 0.9, 1.2, 0.8];
        let si: Vec<f64> = (0..40).map(|i| pattern[i % period]).collect();
        let filter = SeasonalFilter::new(&SeasonalSpec::new(period, 7).unwrap());
        let mut season = vec![0.0; 40];
        assert!(filter.filter(&si, None, Composition::Multiplicative, &mut season));
        for (i, s) in season.iter().enumerate() {
            assert_abs_diff_eq!(*s, pattern[i % period], epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_weight_hides_outlier() {
        let period = 12;
        let clean = sine(120, period, 4.0);
        let mut si = clean.clone();
        si[30] += 80.0;
        let mut weights = vec![1.0; 120];
        weights[30] = 0.0;
        let filter = SeasonalFilter::new(&SeasonalSpec::new(period, 7).unwrap());
        let mut season = vec![0.0; 120];
        assert!(filter.filter(&si, Some(&weights), Composition::Additive, &mut season));
        for (s, expected) in season.iter().zip(clean) {
            assert_abs_diff_eq!(*s, expected, epsilon = 1e-8);
        }
    }

    #[test]
    fn periodic_spec_repeats_every_cycle() {
        let period = 6;
        let si: Vec<f64> = (0..60)
            .map(|i| ((i * 7) % 11) as f64 - 5.0 + [3.0, 1.0, 0.0, -1.0, -2.0, -1.0][i % period])
            .collect();
        let filter = SeasonalFilter::new(&SeasonalSpec::periodic(period).unwrap());
        let mut season = vec![0.0; 60];
        assert!(filter.filter(&si, None, Composition::Additive, &mut season));
        for i in 0..60 - period {
            assert_abs_diff_eq!(season[i], season[i + period], epsilon = 1e-6);
        }
    }

    #[test]
    fn unweighted_phase_is_filled() {
        let period = 4;
        let pattern = [2.0, -1.0, 0.5, -1.5];
        let si: Vec<f64> = (0..40).map(|i| pattern[i % period]).collect();
        let weights: Vec<f64> = (0..40).map(|i| if i % period == 2 { 0.0 } else { 1.0 }).collect();
        let filter = SeasonalFilter::new(&SeasonalSpec::new(period, 7).unwrap());
        let mut season = vec![0.0; 40];
        assert!(filter.filter(&si, Some(&weights), Composition::Additive, &mut season));
        assert!(season.iter().all(|s| s.is_finite()));
        // phase 2 takes the level of phase 1
        for i in (2..40).step_by(period) {
            assert_abs_diff_eq!(season[i], season[i - 1], epsilon = 1e-9);
        }
    }

    #[test]
    fn missing_phase_is_filled() {
        let period = 4;
        let si: Vec<f64> = (0..40)
            .map(|i| if i % period == 2 { f64::NAN } else { (i % period) as f64 })
            .collect();
        let filter = SeasonalFilter::new(&SeasonalSpec::new(period, 7).unwrap());
        let mut season = vec![0.0; 40];
        assert!(filter.filter(&si, None, Composition::Additive, &mut season));
        assert!(season.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn declines_series_shorter_than_period() {
        let filter = SeasonalFilter::new(&SeasonalSpec::new(12, 7).unwrap());
        let si = vec![1.0; 5];
        let mut season = vec![0.0; 5];
        assert!(!filter.filter(&si, None, Composition::Additive, &mut season));

        let mut wrong = vec![0.0; 4];
        assert!(!filter.filter(&[1.0; 24], None, Composition::Additive, &mut wrong));
    }
}
