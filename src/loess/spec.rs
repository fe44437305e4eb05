//! Loess smoother configuration.

use crate::error::{Result, StlError};

/// Weight function of a normalized distance in `[0, 1]`.
///
/// Used both as the Loess distance kernel and as the robustness weight
/// function of the outer STL loop.
///
/// Function addresses are not stable across codegen units, so a `Custom`
/// function never compares equal, not even to itself.
#[derive(Debug, Clone, Copy, Default)]
pub enum WeightFunction {
    /// `(1 - x³)³`, the standard Loess kernel.
    #[default]
    Tricube,
    /// `(1 - x²)²`, the standard robustness weight.
    Biweight,
    /// `1 - x²`.
    Epanechnikov,
    /// `1 - x`.
    Triangular,
    /// Constant 1.
    Uniform,
    /// User supplied function; must be finite and non-negative on `[0, 1]`.
    Custom(fn(f64) -> f64),
}

impl WeightFunction {
    /// Evaluate at `x`. Built-in functions vanish for `|x| >= 1`.
    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        let u = x.abs();
        match self {
            WeightFunction::Custom(f) => f(x),
            _ if u >= 1.0 => 0.0,
            WeightFunction::Tricube => {
                let t = 1.0 - u * u * u;
                t * t * t
            }
            WeightFunction::Biweight => {
                let t = 1.0 - u * u;
                t * t
            }
            WeightFunction::Epanechnikov => 1.0 - u * u,
            WeightFunction::Triangular => 1.0 - u,
            WeightFunction::Uniform => 1.0,
        }
    }

    /// Check that the function is finite and non-negative on `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if let WeightFunction::Custom(f) = self {
            for k in 0..=20 {
                let x = k as f64 / 20.0;
                let w = f(x);
                if !w.is_finite() || w < 0.0 {
                    return Err(StlError::InvalidKernel(format!(
                        "value {} at {} is not a finite non-negative weight",
                        w, x
                    )));
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for WeightFunction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (WeightFunction::Custom(_), _) | (_, WeightFunction::Custom(_)) => false,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// Immutable configuration of one local-regression smoother.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoessSpec {
    window: usize,
    degree: usize,
    jump: usize,
    kernel: WeightFunction,
}

impl LoessSpec {
    /// Smoother with an odd `window` (at least 3) and `degree` 0 or 1.
    ///
    /// The jump defaults to `ceil(window / 10)` and the kernel to tri-cube.
    pub fn new(window: usize, degree: usize) -> Result<Self> {
        if window % 2 == 0 {
            return Err(StlError::InvalidWindow {
                window,
                reason: "must be odd",
            });
        }
        Self::of(window, degree, default_jump(window), WeightFunction::Tricube)
    }

    /// Smoother with every parameter given; the window may be even.
    pub fn of(window: usize, degree: usize, jump: usize, kernel: WeightFunction) -> Result<Self> {
        if window < 2 {
            return Err(StlError::InvalidWindow {
                window,
                reason: "must be at least 2",
            });
        }
        if degree > 1 {
            return Err(StlError::InvalidDegree(degree));
        }
        if jump < 1 {
            return Err(StlError::InvalidJump(jump));
        }
        kernel.validate()?;
        Ok(Self {
            window,
            degree,
            jump,
            kernel,
        })
    }

    /// Replace the jump.
    pub fn with_jump(self, jump: usize) -> Result<Self> {
        Self::of(self.window, self.degree, jump, self.kernel)
    }

    /// Replace the distance kernel.
    pub fn with_kernel(self, kernel: WeightFunction) -> Result<Self> {
        Self::of(self.window, self.degree, self.jump, kernel)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn jump(&self) -> usize {
        self.jump
    }

    pub fn kernel(&self) -> WeightFunction {
        self.kernel
    }
}

/// Classical STL stride: `ceil(window / 10)`.
pub(crate) fn default_jump(window: usize) -> usize {
    window.div_ceil(10).max(1)
}

/// Smallest odd integer greater than or equal to `x`.
pub(crate) fn next_odd(x: usize) -> usize {
    if x % 2 == 0 {
        x + 1
    } else {
        x
    }
}
