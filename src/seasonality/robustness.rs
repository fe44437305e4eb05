//! Robustness weights for the outer STL loop.

use super::composition::Composition;
use crate::loess::WeightFunction;

/// Recompute `weights` from the residuals of `y` against `fit`.
///
/// With `h` the robust scale of the absolute residuals `r`, a position gets
/// weight 1 when `r <= threshold * h`, `function(r / h)` when
/// `r <= (1 - threshold) * h` and 0 otherwise. Missing observations get 0.
/// Returns `h`.
pub(crate) fn update_weights(
    y: &[f64],
    fit: &[f64],
    composition: Composition,
    function: WeightFunction,
    threshold: f64,
    weights: &mut [f64],
) -> f64 {
    let center = composition.neutral();
    let residuals: Vec<f64> = y
        .iter()
        .zip(fit)
        .map(|(y, f)| (composition.invop(*y, *f) - center).abs())
        .collect();

    let mut sorted: Vec<f64> = residuals.iter().copied().filter(|r| r.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    let scale = robust_scale(&sorted);

    let low = threshold * scale;
    let high = (1.0 - threshold) * scale;
    for (w, r) in weights.iter_mut().zip(&residuals) {
        *w = if !r.is_finite() {
            0.0
        } else if *r <= low {
            1.0
        } else if *r <= high {
            function.apply(r / scale)
        } else {
            0.0
        };
    }
    scale
}

/// Six times the median of sorted absolute residuals.
pub(crate) fn robust_scale(sorted: &[f64]) -> f64 {
    let m = sorted.len();
    if m == 0 {
        return 0.0;
    }
    if m % 2 == 1 {
        6.0 * sorted[m / 2]
    } else {
        3.0 * (sorted[m / 2 - 1] + sorted[m / 2])
    }
}
