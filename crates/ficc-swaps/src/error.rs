//! Error types for swap bootstrapping and valuation.

use thiserror::Error;

/// A specialized Result type for swap operations.
pub type SwapResult<T> = Result<T, SwapError>;

/// Errors raised by swap scheduling, bootstrapping, and valuation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwapError {
    /// A required projection curve is missing from the curve set.
    #[error("curve for {index} is not available in the curve set")]
    MissingCurve {
        /// The index whose curve is missing.
        index: String,
    },

    /// Schedule generation failed.
    #[error("schedule error for leg {leg}: {reason}")]
    Schedule {
        /// Which leg failed.
        leg: String,
        /// Description of the failure.
        reason: String,
    },

    /// A frequency unusable for payment schedules.
    #[error("unsupported payment frequency: {frequency}")]
    UnsupportedFrequency {
        /// The offending frequency.
        frequency: String,
    },

    /// The par-spread bracket does not contain a solution.
    #[error(
        "spread bracket does not contain a solution: f({lower_bp} bp) = {f_lower:.6e}, f({upper_bp} bp) = {f_upper:.6e}"
    )]
    SpreadBracket {
        /// Lower bound in basis points.
        lower_bp: f64,
        /// Upper bound in basis points.
        upper_bp: f64,
        /// Objective at the lower bound.
        f_lower: f64,
        /// Objective at the upper bound.
        f_upper: f64,
    },

    /// A solver ran out of iterations.
    #[error("solver failed to converge within {iterations} iterations (residual {residual:.6e})")]
    Convergence {
        /// Iterations used.
        iterations: u32,
        /// Final residual.
        residual: f64,
    },

    /// A valuation input is invalid, naming the leg/period at fault.
    #[error("invalid valuation input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Error propagated from the numerical layer, tagged with the
    /// offending instrument.
    #[error("numerical error for {instrument}: {source}")]
    Numerical {
        /// The offending instrument or tenor.
        instrument: String,
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

impl SwapError {
    /// Creates a missing curve error.
    #[must_use]
    pub fn missing_curve(index: impl Into<String>) -> Self {
        Self::MissingCurve {
            index: index.into(),
        }
    }

    /// Creates a schedule error.
    #[must_use]
    pub fn schedule(leg: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schedule {
            leg: leg.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
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
