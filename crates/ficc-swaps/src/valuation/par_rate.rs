//! Par fixed rates.

use ficc_core::types::Date;

use crate::conventions::LegType;
use crate::error::{SwapError, SwapResult};
use crate::schedule::build_schedule;

use super::discounting::discount_factor;
use super::forwards::forward_rate;
use super::types::{CurveSet, Direction, SwapSpec};

/// The fixed rate that zeroes the swap's NPV.
///
/// `fixed_leg` names which side of the spec carries the fixed leg; the
/// other side's floating PV (including its spread) divides the fixed
/// annuity:
///
/// ```text
/// par = sum alpha_f (F + s) DF / sum alpha_x DF
/// ```
///
/// # Errors
///
/// Returns an error when the named leg is not fixed, the other leg is
/// not floating, or curves are missing.
pub fn par_rate(
    spec: &SwapSpec,
    curves: &CurveSet,
    valuation_date: Date,
    fixed_leg: Direction,
) -> SwapResult<f64> {
    let (fixed_convention, floating_convention, floating_spread_bp) = match fixed_leg {
        Direction::Pay => (&spec.pay_leg, &spec.rec_leg, spec.rec_leg_spread_bp),
        Direction::Receive => (&spec.rec_leg, &spec.pay_leg, spec.pay_leg_spread_bp),
    };
    if fixed_convention.leg_type != LegType::Fixed {
        return Err(SwapError::invalid_input(format!(
            "leg named as fixed ({}) is not a fixed leg",
            fixed_convention.id()
        )));
    }
    if floating_convention.leg_type != LegType::Floating {
        return Err(SwapError::invalid_input(format!(
            "counter leg ({}) is not a floating leg",
            floating_convention.id()
        )));
    }

    let fixed_periods =
        build_schedule(spec.effective_date, spec.maturity_date, fixed_convention)?;
    let floating_periods =
        build_schedule(spec.effective_date, spec.maturity_date, floating_convention)?;

    let mut annuity = 0.0;
    for period in &fixed_periods {
        let alpha = fixed_convention
            .day_count
            .year_fraction(period.accrual_start_adj, period.accrual_end_adj);
        let df = discount_factor(
            period.payment_date,
            curves,
            spec.discounting,
            fixed_convention,
            valuation_date,
        )?;
        annuity += alpha * df;
    }
    if annuity == 0.0 {
        return Err(SwapError::invalid_input("fixed annuity is zero"));
    }

    let spread = floating_spread_bp * 1e-4;
    let mut floating_pv = 0.0;
    for period in &floating_periods {
        let forward = forward_rate(period, floating_convention, curves, valuation_date)?;
        let alpha = floating_convention
            .day_count
            .year_fraction(period.accrual_start_adj, period.accrual_end_adj);
        let df = discount_factor(
            period.payment_date,
            curves,
            spec.discounting,
            floating_convention,
            valuation_date,
        )?;
        floating_pv += alpha * (forward + spread) * df;
    }

    Ok(floating_pv / annuity)
}
