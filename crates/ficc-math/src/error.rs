//! Error types for numerical operations.

use thiserror::Error;

/// A specialized Result type for numerical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors raised by interpolators and root finders.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Root-finding exhausted its iteration budget.
    #[error("convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Bisection bracket does not contain a sign change.
    #[error("invalid bracket: f({a:.6}) = {fa:.2e} and f({b:.6}) = {fb:.2e} have the same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at `a`.
        fa: f64,
        /// Function value at `b`.
        fb: f64,
    },

    /// Bracket expansion gave up without finding a sign change.
    #[error("failed to bracket a root around {guess:.6} after {attempts} expansions")]
    BracketExpansionFailed {
        /// The starting guess.
        guess: f64,
        /// Expansion attempts made.
        attempts: u32,
    },

    /// Newton iteration hit a zero derivative and no fallback succeeded.
    #[error("zero derivative at {x:.6}")]
    ZeroDerivative {
        /// The iterate where the derivative vanished.
        x: f64,
    },

    /// Too few data points for the requested operation.
    #[error("insufficient data: need at least {required}, got {actual}")]
    InsufficientData {
        /// Minimum required points.
        required: usize,
        /// Actual number of points.
        actual: usize,
    },

    /// Invalid input parameter.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an insufficient data error.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }
}
