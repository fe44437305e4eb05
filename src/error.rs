//! Error types for the seasonal-stl library.

use thiserror::Error;

/// Result type alias for decomposition operations.
pub type Result<T> = std::result::Result<T, StlError>;

/// Errors that can occur while configuring or running a decomposition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StlError {
    /// Loess window is too small, or even where an odd window is required.
    #[error("invalid loess window {window}: {reason}")]
    InvalidWindow { window: usize, reason: &'static str },

    /// Local polynomial degree outside {0, 1}.
    #[error("invalid loess degree {0}: must be 0 or 1")]
    InvalidDegree(usize),

    /// Jump (stride) must be at least 1.
    #[error("invalid loess jump {0}: must be at least 1")]
    InvalidJump(usize),

    /// A weight function is negative or non-finite somewhere on [0, 1].
    #[error("invalid weight function: {0}")]
    InvalidKernel(String),

    /// Seasonal period must be positive.
    #[error("invalid seasonal period {0}: must be positive")]
    InvalidPeriod(usize),

    /// At least one seasonal component is required.
    #[error("no seasonal specification given")]
    NoSeasonalSpec,

    /// The same period is declared by two seasonal specifications.
    #[error("duplicate seasonal period {0}")]
    DuplicatePeriod(usize),

    /// Loop counts out of range.
    #[error("invalid loop count: {0}")]
    InvalidLoopCount(String),

    /// Robustness threshold outside (0, 1).
    #[error("invalid robustness threshold {0}: must lie in (0, 1)")]
    InvalidThreshold(f64),

    /// Chained decompositions disagree on additive versus multiplicative mode.
    #[error("chained specifications mix additive and multiplicative composition")]
    MixedComposition,

    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A filter declined its range request.
    #[error("unsupported range request in {stage} filter")]
    UnsupportedRange { stage: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = StlError::EmptyData;
        assert_eq!(err.to_string(), "empty input data");

        let err = StlError::InsufficientData { needed: 24, got: 5 };
        assert_eq!(err.to_string(), "insufficient data: need at least 24, got 5");

        let err = StlError::InvalidWindow {
            window: 4,
            reason: "must be odd",
        };
        assert_eq!(err.to_string(), "invalid loess window 4: must be odd");

        let err = StlError::InvalidDegree(2);
        assert_eq!(err.to_string(), "invalid loess degree 2: must be 0 or 1");

        let err = StlError::UnsupportedRange { stage: "trend" };
        assert_eq!(err.to_string(), "unsupported range request in trend filter");
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = StlError::DuplicatePeriod(12);
        let err2 = err1.clone();
        assert_eq!(err1, err2);
        assert_ne!(err1, StlError::DuplicatePeriod(7));
    }
}
