//! Root-finding algorithms.
//!
//! - [`newton_with_bisection`]: Newton-Raphson with a clamped step,
//!   iterates projected into a bracket, and a bracketed bisection
//!   fallback on zero derivative or iteration exhaustion
//! - [`bisect`]: plain bracketed bisection (requires a sign change)
//! - [`expand_bracket`]: symmetric bracket expansion around a guess

mod bisection;
mod newton;

pub use bisection::{bisect, expand_bracket};
pub use newton::newton_with_bisection;

/// Default bracket expansion factor.
pub const DEFAULT_EXPANSION_FACTOR: f64 = 1.8;

/// Default bracket expansion attempts.
pub const DEFAULT_EXPANSION_ATTEMPTS: u32 = 12;

/// Which method produced a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverMethod {
    /// Newton-Raphson iteration converged.
    Newton,
    /// The bisection fallback converged.
    Bisection,
}

/// Result of a root-finding run.
#[derive(Debug, Clone, Copy)]
pub struct RootResult {
    /// The root found.
    pub root: f64,
    /// Iterations used by the converging method.
    pub iterations: u32,
    /// The method that converged.
    pub method: SolverMethod,
}

/// Configuration for [`newton_with_bisection`].
#[derive(Debug, Clone, Copy)]
pub struct NewtonConfig {
    /// Absolute tolerance on the function value.
    pub tol_value: f64,
    /// Absolute tolerance on successive iterates.
    pub tol_step: f64,
    /// Maximum Newton iterations before falling back.
    pub max_iterations: u32,
    /// Maximum absolute Newton step (e.g. 0.01 = 100 bp).
    pub clamp: f64,
    /// Bracket for projection and fallback; `None` uses the default
    /// yield bracket (-0.02, 0.30) and auto-expands on fallback.
    pub bracket: Option<(f64, f64)>,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tol_value: 1e-6,
            tol_step: 1e-10,
            max_iterations: 50,
            clamp: 0.01,
            bracket: None,
        }
    }
}

impl NewtonConfig {
    /// Sets the value tolerance.
    #[must_use]
    pub fn with_tol_value(mut self, tol: f64) -> Self {
        self.tol_value = tol;
        self
    }

    /// Sets the explicit bracket.
    #[must_use]
    pub fn with_bracket(mut self, lo: f64, hi: f64) -> Self {
        self.bracket = Some((lo, hi));
        self
    }

    /// Sets the maximum step clamp.
    #[must_use]
    pub fn with_clamp(mut self, clamp: f64) -> Self {
        self.clamp = clamp;
        self
    }

    /// Sets the iteration budget.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Configuration for [`bisect`].
#[derive(Debug, Clone, Copy)]
pub struct BisectionConfig {
    /// Tolerance on both the function value and the bracket width.
    pub tolerance: f64,
    /// Maximum iterations.
    pub max_iterations: u32,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl BisectionConfig {
    /// Creates a configuration from tolerance and iteration budget.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

/// The default yield bracket used by the bond YTM solvers.
pub(crate) const DEFAULT_YIELD_BRACKET: (f64, f64) = (-0.02, 0.30);
