//! Swap and leg present values.

use ficc_core::types::Date;

use crate::conventions::{LegType, SwapLegConvention};
use crate::error::SwapResult;
use crate::schedule::build_schedule;

use super::discounting::discount_factor;
use super::forwards::forward_rate;
use super::types::{CouponCashflow, CurveSet, Direction, LegPv, SwapPv, SwapSpec};

/// Prices a swap: both legs, net PV, full cashflow breakdown.
///
/// # Errors
///
/// Returns an error naming the leg and period when scheduling, forward
/// projection, or discounting fails.
pub fn price_swap(
    spec: &SwapSpec,
    curves: &CurveSet,
    valuation_date: Date,
) -> SwapResult<SwapPv> {
    let pay_leg = price_leg(
        spec,
        &spec.pay_leg,
        curves,
        valuation_date,
        Direction::Pay,
        spec.pay_leg_rate,
        spec.pay_leg_spread_bp,
    )?;
    let rec_leg = price_leg(
        spec,
        &spec.rec_leg,
        curves,
        valuation_date,
        Direction::Receive,
        spec.rec_leg_rate,
        spec.rec_leg_spread_bp,
    )?;

    Ok(SwapPv {
        pv_total: rec_leg.pv + pay_leg.pv,
        pay_leg,
        rec_leg,
    })
}

/// Prices one leg of a swap.
///
/// Coupons with payment dates on or after the valuation date are
/// priced; principal exchanges are appended when the spec asks for
/// them. Pay legs carry negative PVs, receive legs positive.
///
/// # Errors
///
/// Returns an error naming the leg and period on failure.
pub fn price_leg(
    spec: &SwapSpec,
    leg: &SwapLegConvention,
    curves: &CurveSet,
    valuation_date: Date,
    direction: Direction,
    fixed_rate: f64,
    spread_bp: f64,
) -> SwapResult<LegPv> {
    let periods = build_schedule(spec.effective_date, spec.maturity_date, leg)?;
    let spread = spread_bp * 1e-4;
    let mut cashflows = Vec::with_capacity(periods.len() + 2);

    if spec.include_principal_exchanges && spec.effective_date >= valuation_date {
        cashflows.push(principal_cashflow(
            spec,
            leg,
            curves,
            valuation_date,
            direction,
            true,
        )?);
    }

    for period in &periods {
        if period.payment_date < valuation_date {
            continue;
        }

        let accrual_fraction = leg
            .day_count
            .year_fraction(period.accrual_start_adj, period.accrual_end_adj);

        let (forward, fixed, effective_rate) = if leg.leg_type == LegType::Floating {
            let f = forward_rate(period, leg, curves, valuation_date)?;
            (Some(f), None, f + spread)
        } else {
            (None, Some(fixed_rate), fixed_rate)
        };

        let mut df = discount_factor(
            period.payment_date,
            curves,
            spec.discounting,
            leg,
            valuation_date,
        )?;
        if spec.discount_coupons_from_spot
            && spec.include_principal_exchanges
            && period.payment_date >= spec.effective_date
        {
            let df_spot = discount_factor(
                spec.effective_date,
                curves,
                spec.discounting,
                leg,
                valuation_date,
            )?;
            if df_spot != 0.0 {
                df /= df_spot;
            }
        }

        let payment = direction.sign() * spec.notional * accrual_fraction * effective_rate;
        let pv = payment * df;

        cashflows.push(CouponCashflow {
            idx: period.index as i32,
            accrual_start: period.accrual_start_adj,
            accrual_end: period.accrual_end_adj,
            reset_date: period.reset_date,
            fixing_date: period.fixing_date,
            payment_date: period.payment_date,
            accrual_fraction,
            forward_rate: forward,
            fixed_rate: fixed,
            discount_factor: df,
            pv,
            notional: spec.notional,
            payment,
        });
    }

    if spec.include_principal_exchanges && spec.maturity_date >= valuation_date {
        cashflows.push(principal_cashflow(
            spec,
            leg,
            curves,
            valuation_date,
            direction,
            false,
        )?);
    }

    let pv = cashflows.iter().map(|cf| cf.pv).sum();
    Ok(LegPv {
        convention_id: leg.id(),
        direction,
        pv,
        cashflows,
    })
}

/// A principal exchange at the effective date (initial) or maturity
/// (final).
///
/// Initial: the receive leg posts notional (-N), the pay leg takes it
/// (+N). Final: the receive leg gets notional back (+N), the pay leg
/// returns it (-N).
fn principal_cashflow(
    spec: &SwapSpec,
    leg: &SwapLegConvention,
    curves: &CurveSet,
    valuation_date: Date,
    direction: Direction,
    is_initial: bool,
) -> SwapResult<CouponCashflow> {
    let payment_date = if is_initial {
        spec.effective_date
    } else {
        spec.maturity_date
    };
    let df = discount_factor(payment_date, curves, spec.discounting, leg, valuation_date)?;

    let sign = match (is_initial, direction) {
        (true, Direction::Receive) | (false, Direction::Pay) => -1.0,
        (true, Direction::Pay) | (false, Direction::Receive) => 1.0,
    };

    let payment = sign * spec.notional;
    Ok(CouponCashflow {
        idx: if is_initial { 0 } else { -1 },
        accrual_start: payment_date,
        accrual_end: payment_date,
        reset_date: None,
        fixing_date: None,
        payment_date,
        accrual_fraction: 0.0,
        forward_rate: None,
        fixed_rate: None,
        discount_factor: df,
        pv: payment * df,
        notional: spec.notional,
        payment,
    })
}
