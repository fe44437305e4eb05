//! Additive / multiplicative composition of components.

/// How components combine into the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Composition {
    /// `y = trend + seasonal + irregular`
    #[default]
    Additive,
    /// `y = trend * seasonal * irregular`
    Multiplicative,
}

impl Composition {
    pub fn from_multiplicative(multiplicative: bool) -> Self {
        if multiplicative {
            Composition::Multiplicative
        } else {
            Composition::Additive
        }
    }

    pub fn is_multiplicative(self) -> bool {
        self == Composition::Multiplicative
    }

    /// Neutral element: 0 or 1.
    #[inline]
    pub fn neutral(self) -> f64 {
        match self {
            Composition::Additive => 0.0,
            Composition::Multiplicative => 1.0,
        }
    }

    /// Combine two components.
    #[inline]
    pub fn op(self, a: f64, b: f64) -> f64 {
        match self {
            Composition::Additive => a + b,
            Composition::Multiplicative => a * b,
        }
    }

    /// Remove component `b` from `a`.
    #[inline]
    pub fn invop(self, a: f64, b: f64) -> f64 {
        match self {
            Composition::Additive => a - b,
            Composition::Multiplicative => a / b,
        }
    }
}
