//! # FICC Math
//!
//! Numerical kernels for the FICC fixed income analytics library:
//!
//! - **Interpolation**: linear, log-linear, piecewise-constant, and
//!   step-forward-continuous kernels over sorted pillars, all with flat
//!   extrapolation unless documented otherwise
//! - **Root finding**: Newton-Raphson with step clamping and a bracketed
//!   bisection fallback, plain bisection, and symmetric bracket expansion
//!
//! Everything works in `f64`; tolerances, iteration budgets, and bracket
//! policies are explicit configuration so bootstrap results are
//! reproducible bit-for-bit across runs.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod interpolation;
pub mod solvers;

pub use error::{MathError, MathResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        Interpolator, LinearInterpolator, LogLinearInterpolator, PiecewiseConstantInterpolator,
        StepForwardInterpolator,
    };
    pub use crate::solvers::{
        bisect, expand_bracket, newton_with_bisection, BisectionConfig, NewtonConfig, RootResult,
    };
}
