//! Bracketed bisection and bracket expansion.

use crate::error::{MathError, MathResult};

use super::{BisectionConfig, RootResult, SolverMethod};

/// Bracketed bisection.
///
/// Requires a sign change over `[lo, hi]`. Iterates until either the
/// function value or the bracket width is within tolerance.
///
/// # Errors
///
/// - [`MathError::InvalidBracket`] when both endpoints have the same sign
/// - [`MathError::ConvergenceFailed`] when the iteration budget runs out
///
/// # Example
///
/// ```rust
/// use ficc_math::solvers::{bisect, BisectionConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let result = bisect(&f, 1.0, 2.0, &BisectionConfig::new(1e-10, 100)).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisect<F>(f: &F, lo: f64, hi: f64, config: &BisectionConfig) -> MathResult<RootResult>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo == 0.0 {
        return Ok(RootResult {
            root: lo,
            iterations: 0,
            method: SolverMethod::Bisection,
        });
    }
    if f_hi == 0.0 {
        return Ok(RootResult {
            root: hi,
            iterations: 0,
            method: SolverMethod::Bisection,
        });
    }
    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    for iteration in 1..=config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);

        if f_mid.abs() <= config.tolerance || (hi - lo).abs() <= config.tolerance {
            return Ok(RootResult {
                root: mid,
                iterations: iteration,
                method: SolverMethod::Bisection,
            });
        }

        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    let mid = 0.5 * (lo + hi);
    Err(MathError::convergence_failed(
        config.max_iterations,
        f(mid).abs(),
    ))
}

/// Expands a bracket symmetrically around `guess` until a sign change.
///
/// Each attempt scales both half-widths by `factor`. A zero at an
/// endpoint is returned as a degenerate bracket.
///
/// # Errors
///
/// Returns [`MathError::BracketExpansionFailed`] when `max_attempts`
/// expansions do not produce a sign change.
pub fn expand_bracket<F>(
    f: &F,
    guess: f64,
    lo: f64,
    hi: f64,
    factor: f64,
    max_attempts: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let mut a = lo;
    let mut b = hi;
    let mut f_a = f(a);
    let mut f_b = f(b);

    for _ in 0..max_attempts {
        if f_a == 0.0 {
            return Ok((a, a));
        }
        if f_b == 0.0 {
            return Ok((b, b));
        }
        if f_a * f_b < 0.0 {
            return Ok((a, b));
        }
        a = guess - (guess - a) * factor;
        b = guess + (b - guess) * factor;
        f_a = f(a);
        f_b = f(b);
    }

    Err(MathError::BracketExpansionFailed {
        guess,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let result = bisect(&f, 1.0, 2.0, &BisectionConfig::new(1e-12, 100)).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;
        let result = bisect(&f, 2.0, 3.0, &BisectionConfig::default());
        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;
        let result = bisect(&f, 1.0, 2.0, &BisectionConfig::default()).unwrap();
        assert_relative_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_negative_root() {
        let f = |x: f64| x + 1.0;
        let result = bisect(&f, -2.0, 0.0, &BisectionConfig::new(1e-12, 100)).unwrap();
        assert_relative_eq!(result.root, -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_expand_bracket_finds_wider_range() {
        // Root at 5, initial bracket [0, 1] misses it
        let f = |x: f64| x - 5.0;
        let (a, b) = expand_bracket(&f, 0.5, 0.0, 1.0, 1.8, 12).unwrap();
        assert!(f(a) * f(b) < 0.0);
        assert!(b >= 5.0);
    }

    #[test]
    fn test_expand_bracket_gives_up() {
        // No real root
        let f = |x: f64| x * x + 1.0;
        let result = expand_bracket(&f, 0.0, -1.0, 1.0, 1.8, 12);
        assert!(matches!(result, Err(MathError::BracketExpansionFailed { .. })));
    }
}
