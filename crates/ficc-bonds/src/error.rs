//! Error types for bond analytics.

use thiserror::Error;

/// A specialized Result type for bond operations.
pub type BondResult<T> = Result<T, BondError>;

/// Errors raised by bond pricing and risk analytics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BondError {
    /// The bond specification itself is invalid.
    #[error("invalid bond specification: {reason}")]
    InvalidBondSpec {
        /// Description of what is invalid.
        reason: String,
    },

    /// A yield input is out of the admissible range.
    #[error("invalid yield {value}: {reason}")]
    InvalidYield {
        /// The offending yield (decimal).
        value: f64,
        /// Why it is invalid.
        reason: String,
    },

    /// The futures forward-yield solver exhausted its cascade.
    #[error("failed to solve forward yield for bond maturing {maturity}")]
    ForwardYieldFailed {
        /// Maturity of the offending underlying.
        maturity: String,
    },

    /// Error propagated from the numerical layer.
    #[error("numerical error in {context}: {source}")]
    Numerical {
        /// What was being solved.
        context: String,
        /// The underlying numerical error.
        source: ficc_math::MathError,
    },

    /// Error propagated from the curve layer.
    #[error(transparent)]
    Curve(#[from] ficc_curves::CurveError),

    /// Error propagated from the core layer.
    #[error(transparent)]
    Core(#[from] ficc_core::CoreError),
}

impl BondError {
    /// Creates an invalid bond specification error.
    #[must_use]
    pub fn invalid_spec(reason: impl Into<String>) -> Self {
        Self::InvalidBondSpec {
            reason: reason.into(),
        }
    }

    /// Wraps a numerical error with context.
    #[must_use]
    pub fn numerical(context: impl Into<String>, source: ficc_math::MathError) -> Self {
        Self::Numerical {
            context: context.into(),
            source,
        }
    }
}
