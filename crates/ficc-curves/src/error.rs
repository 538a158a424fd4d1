//! Error types for curve construction and bootstrapping.

use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Errors raised by curve construction and bootstrapping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// A curve was constructed with no nodes.
    #[error("curve has no nodes")]
    EmptyCurve,

    /// Pillar times are not strictly increasing.
    #[error("pillar times must be strictly increasing: {reason}")]
    NonMonotonePillars {
        /// Description of the violation.
        reason: String,
    },

    /// A tenor or discount factor value is out of range.
    #[error("invalid curve data: {reason}")]
    InvalidData {
        /// Description of what is invalid.
        reason: String,
    },

    /// Unknown compounding specifier.
    #[error("unsupported compounding: {name}")]
    UnsupportedCompounding {
        /// The unrecognized specifier.
        name: String,
    },

    /// Unknown interpolation method name.
    #[error("unsupported interpolation method: {name}")]
    UnsupportedInterpolation {
        /// The unrecognized name.
        name: String,
    },

    /// The bootstrap residual could not be bracketed for an instrument.
    #[error("cannot bracket bootstrap residual for {instrument}: f({lo}) = {f_lo:.3e}, f({hi}) = {f_hi:.3e}")]
    BracketingFailed {
        /// Identifier of the offending instrument or tenor.
        instrument: String,
        /// Lower bracket bound.
        lo: f64,
        /// Upper bracket bound.
        hi: f64,
        /// Residual at the lower bound.
        f_lo: f64,
        /// Residual at the upper bound.
        f_hi: f64,
    },

    /// The bond bootstrap queue stopped making progress.
    #[error("bootstrap cannot make progress; missing earlier discount factors for: {pending}")]
    NoProgress {
        /// Identifiers of the bonds still waiting.
        pending: String,
    },

    /// A solved discount factor came out non-positive.
    #[error("non-positive discount factor solved for {instrument}: {value}")]
    NonPositiveDiscount {
        /// Identifier of the offending instrument or tenor.
        instrument: String,
        /// The offending value.
        value: f64,
    },

    /// Error propagated from the numerical layer.
    #[error("numerical error for {instrument}: {source}")]
    Numerical {
        /// Identifier of the offending instrument or tenor.
        instrument: String,
        /// The underlying numerical error.
        source: ficc_math::MathError,
    },

    /// Error propagated from the core layer.
    #[error(transparent)]
    Core(#[from] ficc_core::CoreError),
}

impl CurveError {
    /// Creates an invalid data error.
    #[must_use]
    pub fn invalid_data(reason: impl Into<String>) -> Self {
        Self::InvalidData {
            reason: reason.into(),
        }
    }

    /// Creates a non-monotone pillar error.
    #[must_use]
    pub fn non_monotone(reason: impl Into<String>) -> Self {
        Self::NonMonotonePillars {
            reason: reason.into(),
        }
    }

    /// Wraps a numerical error with the offending instrument tag.
    #[must_use]
    pub fn numerical(instrument: impl Into<String>, source: ficc_math::MathError) -> Self {
        Self::Numerical {
            instrument: instrument.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_carries_instrument() {
        let err = CurveError::BracketingFailed {
            instrument: "10Y".into(),
            lo: 0.01,
            hi: 1.5,
            f_lo: 0.1,
            f_hi: 0.2,
        };
        assert!(err.to_string().contains("10Y"));
    }
}
