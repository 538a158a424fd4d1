//! Par-spread solver.

use ficc_core::types::Date;

use crate::error::{SwapError, SwapResult};

use super::pv::price_swap;
use super::types::{CurveSet, SwapPv, SwapSpec};

/// Configuration for the receive-leg spread bisection.
#[derive(Debug, Clone, Copy)]
pub struct SpreadSolverConfig {
    /// Target net PV (0 for a fair swap).
    pub target: f64,
    /// Absolute tolerance on the objective, in PV units.
    pub tolerance: f64,
    /// Maximum bisection iterations.
    pub max_iterations: u32,
    /// Lower spread bound, basis points.
    pub lower_bound_bp: f64,
    /// Upper spread bound, basis points.
    pub upper_bound_bp: f64,
}

impl Default for SpreadSolverConfig {
    fn default() -> Self {
        Self {
            target: 0.0,
            tolerance: 1e-6,
            max_iterations: 100,
            lower_bound_bp: -500.0,
            upper_bound_bp: 500.0,
        }
    }
}

impl SpreadSolverConfig {
    /// Sets the objective tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Solves the receive-leg spread (basis points) that brings the leg
/// balance to the target.
///
/// Bisects the objective `rec_pv + pay_pv - target` over the configured
/// spread range. Returns the solved spread and the swap PV at it.
///
/// # Errors
///
/// - [`SwapError::SpreadBracket`] when the objective has the same sign
///   at both bounds
/// - [`SwapError::Convergence`] when the iteration budget runs out
/// - pricing errors propagate
pub fn solve_receive_leg_spread(
    spec: &SwapSpec,
    curves: &CurveSet,
    valuation_date: Date,
    config: &SpreadSolverConfig,
) -> SwapResult<(f64, SwapPv)> {
    let objective = |spread_bp: f64| -> SwapResult<(f64, SwapPv)> {
        let mut candidate = spec.clone();
        candidate.rec_leg_spread_bp = spread_bp;
        let result = price_swap(&candidate, curves, valuation_date)?;
        let balance = result.rec_leg.pv + result.pay_leg.pv;
        Ok((balance - config.target, result))
    };

    let mut lower_bp = config.lower_bound_bp;
    let mut upper_bp = config.upper_bound_bp;
    let (mut lower_value, lower_result) = objective(lower_bp)?;
    let (upper_value, upper_result) = objective(upper_bp)?;

    if lower_value.abs() <= config.tolerance {
        return Ok((lower_bp, lower_result));
    }
    if upper_value.abs() <= config.tolerance {
        return Ok((upper_bp, upper_result));
    }
    if lower_value * upper_value > 0.0 {
        return Err(SwapError::SpreadBracket {
            lower_bp,
            upper_bp,
            f_lower: lower_value,
            f_upper: upper_value,
        });
    }

    for iteration in 1..=config.max_iterations {
        let mid_bp = 0.5 * (lower_bp + upper_bp);
        let (mid_value, mid_result) = objective(mid_bp)?;

        if mid_value.abs() <= config.tolerance {
            log::debug!("spread solved in {iteration} iterations: {mid_bp} bp");
            return Ok((mid_bp, mid_result));
        }

        if lower_value * mid_value <= 0.0 {
            upper_bp = mid_bp;
        } else {
            lower_bp = mid_bp;
            lower_value = mid_value;
        }
    }

    let final_bp = 0.5 * (lower_bp + upper_bp);
    let (residual, _) = objective(final_bp)?;
    Err(SwapError::Convergence {
        iterations: config.max_iterations,
        residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{euribor_3m_floating, euribor_6m_floating};
    use ficc_core::calendars::{Calendar, WeekendCalendar};
    use ficc_curves::discount::DiscountCurve;
    use ficc_curves::projection::ProjectionCurve;
    use std::sync::Arc;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn cal() -> Arc<dyn Calendar> {
        Arc::new(WeekendCalendar)
    }

    fn curves() -> CurveSet {
        let reference = d("2025-08-08");
        CurveSet::new(DiscountCurve::flat(reference, 0.03, 45.0, "EUR-OIS").unwrap())
            .with_euribor3m(
                ProjectionCurve::flat(reference, "EUR-EURIBOR3M", 0.0315, 45.0).unwrap(),
            )
            .with_euribor6m(
                ProjectionCurve::flat(reference, "EUR-EURIBOR6M", 0.0330, 45.0).unwrap(),
            )
    }

    fn basis_spec() -> SwapSpec {
        // Pay 6M, receive 3M, forward starting 10Y for 10 years
        SwapSpec::new(
            10_000_000.0,
            d("2035-08-12"),
            d("2045-08-12"),
            euribor_6m_floating(cal()),
            euribor_3m_floating(cal()),
        )
    }

    #[test]
    fn test_basis_spread_solves_to_zero_npv() {
        // The solved spread must be finite, below
        // 50bp in magnitude, and the swap PV at it is inside tolerance
        let curves = curves();
        let config = SpreadSolverConfig::default().with_tolerance(1e-3);
        let (spread_bp, result) =
            solve_receive_leg_spread(&basis_spec(), &curves, d("2025-08-08"), &config).unwrap();

        assert!(spread_bp.is_finite());
        assert!(spread_bp.abs() <= 50.0, "spread = {spread_bp} bp");
        assert!(result.pv_total.abs() <= 1e-3, "pv = {}", result.pv_total);
        // Receiving the lower 3M curve needs a positive spread
        assert!(spread_bp > 0.0);
    }

    #[test]
    fn test_solved_spread_reprices_consistently() {
        let curves = curves();
        let config = SpreadSolverConfig::default().with_tolerance(1e-3);
        let spec = basis_spec();
        let (spread_bp, _) =
            solve_receive_leg_spread(&spec, &curves, d("2025-08-08"), &config).unwrap();

        let mut repriced = spec.clone();
        repriced.rec_leg_spread_bp = spread_bp;
        let result = price_swap(&repriced, &curves, d("2025-08-08")).unwrap();
        assert!(result.pv_total.abs() <= 1e-3);
    }

    #[test]
    fn test_unbracketable_target_is_typed_error() {
        let curves = curves();
        // A target no spread in [-500, 500] bp can reach
        let config = SpreadSolverConfig {
            target: 1e12,
            ..SpreadSolverConfig::default()
        };
        let err =
            solve_receive_leg_spread(&basis_spec(), &curves, d("2025-08-08"), &config).unwrap_err();
        assert!(matches!(err, SwapError::SpreadBracket { .. }));
    }
}
