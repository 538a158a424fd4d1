//! Newton-Raphson with clamped steps and a bisection fallback.

use crate::error::MathResult;

use super::{
    bisect, expand_bracket, BisectionConfig, NewtonConfig, RootResult, SolverMethod,
    DEFAULT_EXPANSION_ATTEMPTS, DEFAULT_EXPANSION_FACTOR, DEFAULT_YIELD_BRACKET,
};

/// Newton-Raphson root finder with a bisection fallback.
///
/// Each iteration evaluates `(f, f')`, clamps the Newton step to
/// `config.clamp`, and projects the iterate into the bracket. Converges
/// on `|f| <= tol_value` or `|Δx| <= tol_step`. A zero derivative or an
/// exhausted iteration budget falls back to bisection over the explicit
/// bracket, or over an auto-expanded one when no bracket was given.
///
/// # Errors
///
/// Propagates the fallback bisection error when both methods fail.
///
/// # Example
///
/// ```rust
/// use ficc_math::solvers::{newton_with_bisection, NewtonConfig};
///
/// // Solve exp(-x) = 0.95
/// let f = |x: f64| ((-x).exp() - 0.95, -(-x).exp());
/// let config = NewtonConfig::default().with_bracket(0.0, 1.0).with_tol_value(1e-12);
/// let result = newton_with_bisection(&f, 0.02, &config).unwrap();
/// assert!((result.root - 0.95_f64.ln().abs()).abs() < 1e-9);
/// ```
pub fn newton_with_bisection<F>(
    f_and_df: &F,
    initial_guess: f64,
    config: &NewtonConfig,
) -> MathResult<RootResult>
where
    F: Fn(f64) -> (f64, f64),
{
    let (lower, upper) = config.bracket.unwrap_or(DEFAULT_YIELD_BRACKET);
    let mut x = initial_guess;

    for iteration in 1..=config.max_iterations {
        let (value, deriv) = f_and_df(x);
        log::debug!("newton iter {iteration}: x={x} value={value} deriv={deriv}");

        if value.abs() <= config.tol_value {
            return Ok(RootResult {
                root: x,
                iterations: iteration,
                method: SolverMethod::Newton,
            });
        }
        if deriv == 0.0 {
            log::debug!("zero derivative at iter {iteration}; falling back to bisection");
            break;
        }

        let mut step = value / deriv;
        if step.abs() > config.clamp {
            step = config.clamp.copysign(step);
        }
        let x_new = (x - step).clamp(lower, upper);

        if (x_new - x).abs() <= config.tol_step {
            return Ok(RootResult {
                root: x_new,
                iterations: iteration,
                method: SolverMethod::Newton,
            });
        }
        x = x_new;
    }

    let f_only = |v: f64| f_and_df(v).0;

    let (b_lower, b_upper) = if config.bracket.is_some() {
        (lower, upper)
    } else {
        // Expand around the last Newton iterate; fall back to the
        // default bracket when expansion fails to find a sign change.
        expand_bracket(
            &f_only,
            x,
            lower,
            upper,
            DEFAULT_EXPANSION_FACTOR,
            DEFAULT_EXPANSION_ATTEMPTS,
        )
        .unwrap_or((lower, upper))
    };

    let bisect_config = BisectionConfig::new(config.tol_value, 100);
    bisect(&f_only, b_lower, b_upper, &bisect_config)
}
