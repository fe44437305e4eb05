//! Loess smoothing over indexed views, with edge extrapolation.
//!
//! The smoother follows the classical STL routine (Cleveland et al. 1990):
//! a local polynomial of degree 0 or 1 is fitted around each output position
//! on a neighborhood of at most `window` points, using tri-cube (or any
//! configured) distance weights times optional per-position robustness
//! weights. With `jump > 1` the fit is evaluated only every `jump` positions
//! and at the last position; the gaps are filled by linear interpolation.
//!
//! Positions of the destination outside the source range are extrapolated
//! with the nearest edge neighborhood.

use tracing::warn;

use super::spec::LoessSpec;
use super::window::{DataWindow, DataWindowMut};

/// Applies one [`LoessSpec`] to source views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoessFilter {
    spec: LoessSpec,
}

impl LoessFilter {
    pub fn new(spec: LoessSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &LoessSpec {
        &self.spec
    }

    /// Smooth `y` (range `[i0, i1)`) into `ys` (range `[j0, j1)`).
    ///
    /// `weights`, when given, is addressed with the same logical indices as
    /// `y`. Returns `false` without writing anything unless
    /// `j0 <= i0 < i1 <= j1`. Positions where no neighbor carries weight are
    /// filled from the nearest defined output; when no source position is
    /// observed with positive weight every output is NaN.
    pub fn filter(
        &self,
        y: &DataWindow<'_>,
        weights: Option<&DataWindow<'_>>,
        ys: &mut DataWindowMut<'_>,
    ) -> bool {
        let (i0, i1) = (y.start(), y.end());
        let (j0, j1) = (ys.start(), ys.end());
        if i1 <= i0 || j0 > i0 || j1 < i1 {
            return false;
        }

        let n = y.len();
        if n < 2 {
            let value = y.get(i0);
            for ix in j0..j1 {
                ys.set(ix, value);
            }
            return true;
        }

        let mut fit = LocalFit::new(&self.spec, *y, weights.copied(), n);
        let mut degenerate = 0usize;

        self.smooth_range(&mut fit, ys, &mut degenerate);
        self.extrapolate(&mut fit, ys, &mut degenerate);

        if degenerate > 0 {
            warn!(
                degenerate,
                window = self.spec.window(),
                "loess positions without weight replaced by flat extrapolation"
            );
            fill_gaps(ys);
        }
        true
    }

    /// Fit every position of the source range, honoring the jump.
    fn smooth_range(&self, fit: &mut LocalFit<'_>, ys: &mut DataWindowMut<'_>, degenerate: &mut usize) {
        let (i0, i1) = (fit.y.start(), fit.y.end());
        let n = fit.n as isize;
        let window = self.spec.window() as isize;
        let jump = self.spec.jump().min(fit.n - 1) as isize;

        if window >= n {
            let (nleft, nright) = (i0, i1 - 1);
            let mut i = i0;
            while i < i1 {
                store(ys, i, fit.estimate(i, nleft, nright), degenerate);
                i += jump;
            }
        } else if jump == 1 {
            let nsh = (window + 1) / 2;
            let (mut nleft, mut nright) = (i0, i0 + window - 1);
            for i in i0..i1 {
                if i - i0 + 1 > nsh && nright != i1 - 1 {
                    nleft += 1;
                    nright += 1;
                }
                store(ys, i, fit.estimate(i, nleft, nright), degenerate);
            }
        } else {
            let nsh = (window + 1) / 2;
            let mut i = i0;
            while i < i1 {
                let pos = i - i0 + 1;
                let (nleft, nright) = if pos < nsh {
                    (i0, i0 + window - 1)
                } else if pos >= n - nsh + 1 {
                    (i1 - window, i1 - 1)
                } else {
                    let left = i0 + pos - nsh;
                    (left, left + window - 1)
                };
                store(ys, i, fit.estimate(i, nleft, nright), degenerate);
                i += jump;
            }
        }

        if jump > 1 {
            let mut i = i0;
            while i + jump < i1 {
                interpolate(ys, i, i + jump);
                i += jump;
            }
            let last = i0 + ((n - 1) / jump) * jump;
            if last != i1 - 1 {
                let (nleft, nright) = ((i1 - window).max(i0), i1 - 1);
                store(ys, i1 - 1, fit.estimate(i1 - 1, nleft, nright), degenerate);
                interpolate(ys, last, i1 - 1);
            }
        }
    }

    /// Fill `[j0, i0)` and `[i1, j1)` from the edge neighborhoods.
    fn extrapolate(&self, fit: &mut LocalFit<'_>, ys: &mut DataWindowMut<'_>, degenerate: &mut usize) {
        let (i0, i1) = (fit.y.start(), fit.y.end());
        let (j0, j1) = (ys.start(), ys.end());
        let window = self.spec.window() as isize;

        if j0 < i0 {
            let (nleft, nright) = (i0, (i0 + window - 1).min(i1 - 1));
            for ix in (j0..i0).rev() {
                let value = match fit.estimate(ix, nleft, nright) {
                    Some(v) => v,
                    None => {
                        *degenerate += 1;
                        ys.get(ix + 1)
                    }
                };
                ys.set(ix, value);
            }
        }
        if j1 > i1 {
            let (nleft, nright) = ((i1 - window).max(i0), i1 - 1);
            for ix in i1..j1 {
                let value = match fit.estimate(ix, nleft, nright) {
                    Some(v) => v,
                    None => {
                        *degenerate += 1;
                        ys.get(ix - 1)
                    }
                };
                ys.set(ix, value);
            }
        }
    }
}

/// One local regression problem: source, robustness weights and scratch.
struct LocalFit<'a> {
    spec: &'a LoessSpec,
    y: DataWindow<'a>,
    weights: Option<DataWindow<'a>>,
    n: usize,
    work: Vec<f64>,
}

impl<'a> LocalFit<'a> {
    fn new(
        spec: &'a LoessSpec,
        y: DataWindow<'a>,
        weights: Option<DataWindow<'a>>,
        n: usize,
    ) -> Self {
        Self {
            spec,
            y,
            weights,
            n,
            work: vec![0.0; spec.window().min(n)],
        }
    }

    /// Fitted value at `xs` over the neighborhood `[nleft, nright]`, or
    /// `None` when no neighbor carries weight.
    fn estimate(&mut self, xs: isize, nleft: isize, nright: isize) -> Option<f64> {
        if !self.local_weights(xs, nleft, nright) {
            return None;
        }
        let mut value = 0.0;
        for (w, j) in self.work.iter().zip(nleft..=nright) {
            if *w != 0.0 {
                value += w * self.y.get(j);
            }
        }
        Some(value)
    }

    /// Fill `work[..=nright - nleft]` with regression weights summing to 1.
    fn local_weights(&mut self, xs: isize, nleft: isize, nright: isize) -> bool {
        let window = self.spec.window();
        let kernel = self.spec.kernel();
        let count = (nright - nleft + 1) as usize;
        let work = &mut self.work[..count];

        let mut h = (xs - nleft).max(nright - xs) as f64;
        if window > self.n {
            h += 0.5 * (window - self.n) as f64;
        }
        let h9 = 0.999 * h;
        let h1 = 0.001 * h;

        let mut total = 0.0;
        for (w, j) in work.iter_mut().zip(nleft..=nright) {
            *w = 0.0;
            if !self.y.get(j).is_finite() {
                continue;
            }
            let r = (j - xs).abs() as f64;
            if r < h9 {
                *w = if r < h1 { 1.0 } else { kernel.apply(r / h) };
                if let Some(rw) = &self.weights {
                    *w *= rw.get(j);
                }
            }
            total += *w;
        }
        if total <= 0.0 || !total.is_finite() {
            return false;
        }
        for w in work.iter_mut() {
            *w /= total;
        }

        if h > 0.0 && self.spec.degree() == 1 {
            let a: f64 = work.iter().zip(nleft..).map(|(w, j)| w * j as f64).sum();
            let c: f64 = work
                .iter()
                .zip(nleft..)
                .map(|(w, j)| {
                    let d = j as f64 - a;
                    w * d * d
                })
                .sum();
            let range = (self.n - 1) as f64;
            // near-collinear neighborhoods keep the degree-0 weights
            if c.sqrt() > 0.001 * range {
                let b = (xs as f64 - a) / c;
                for (w, j) in work.iter_mut().zip(nleft..) {
                    *w *= b * (j as f64 - a) + 1.0;
                }
            }
        }
        true
    }
}

#[inline]
fn store(ys: &mut DataWindowMut<'_>, ix: isize, value: Option<f64>, degenerate: &mut usize) {
    match value {
        Some(v) => ys.set(ix, v),
        None => {
            *degenerate += 1;
            ys.set(ix, f64::NAN);
        }
    }
}

/// Linear interpolation of the open interval `(from, to)`.
fn interpolate(ys: &mut DataWindowMut<'_>, from: isize, to: isize) {
    let start = ys.get(from);
    let delta = (ys.get(to) - start) / (to - from) as f64;
    for j in from + 1..to {
        ys.set(j, start + delta * (j - from) as f64);
    }
}

/// Replace undefined outputs by the nearest defined neighbor, preferring
/// the previous one.
pub(crate) fn fill_gaps(ys: &mut DataWindowMut<'_>) {
    let (j0, j1) = (ys.start(), ys.end());
    for ix in j0 + 1..j1 {
        if ys.get(ix).is_nan() {
            let prev = ys.get(ix - 1);
            if !prev.is_nan() {
                ys.set(ix, prev);
            }
        }
    }
    for ix in (j0..j1 - 1).rev() {
        if ys.get(ix).is_nan() {
            let next = ys.get(ix + 1);
            if !next.is_nan() {
                ys.set(ix, next);
            }
        }
    }
}
