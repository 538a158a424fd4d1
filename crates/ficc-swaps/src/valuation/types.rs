//! Valuation data types: curve set, swap specification, PV reports.

use serde::Serialize;

use ficc_core::calendars::BusinessDayAdjustment;
use ficc_core::types::Date;
use ficc_curves::discount::DiscountCurve;
use ficc_curves::projection::ProjectionCurve;

use crate::conventions::{RollConvention, SwapLegConvention};

/// Which curve family discounts cashflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Discounting {
    /// OIS discounting for every leg (the standard multi-curve setup).
    Ois,
    /// Each floating leg discounts on its own projection curve.
    Projection,
}

/// Leg direction from the valuation party's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// The party pays this leg: PVs carry a negative sign.
    Pay,
    /// The party receives this leg: PVs carry a positive sign.
    Receive,
}

impl Direction {
    /// -1 for pay, +1 for receive.
    #[must_use]
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Pay => -1.0,
            Direction::Receive => 1.0,
        }
    }
}

/// The curves a valuation may need.
#[derive(Debug, Clone)]
pub struct CurveSet {
    /// OIS discount curve (also the ESTR projection curve).
    pub ois_curve: DiscountCurve,
    /// EURIBOR 3M projection curve.
    pub euribor3m_curve: Option<ProjectionCurve>,
    /// EURIBOR 6M projection curve.
    pub euribor6m_curve: Option<ProjectionCurve>,
}

impl CurveSet {
    /// A curve set with OIS only.
    #[must_use]
    pub fn new(ois_curve: DiscountCurve) -> Self {
        Self {
            ois_curve,
            euribor3m_curve: None,
            euribor6m_curve: None,
        }
    }

    /// Attaches the EURIBOR 3M curve.
    #[must_use]
    pub fn with_euribor3m(mut self, curve: ProjectionCurve) -> Self {
        self.euribor3m_curve = Some(curve);
        self
    }

    /// Attaches the EURIBOR 6M curve.
    #[must_use]
    pub fn with_euribor6m(mut self, curve: ProjectionCurve) -> Self {
        self.euribor6m_curve = Some(curve);
        self
    }
}

/// Complete specification of a swap to price.
#[derive(Clone)]
pub struct SwapSpec {
    /// Notional in currency units.
    pub notional: f64,
    /// Swap start date.
    pub effective_date: Date,
    /// Swap end date.
    pub maturity_date: Date,
    /// Convention of the paid leg.
    pub pay_leg: SwapLegConvention,
    /// Convention of the received leg.
    pub rec_leg: SwapLegConvention,
    /// Fixed rate of the pay leg, when fixed (decimal).
    pub pay_leg_rate: f64,
    /// Fixed rate of the receive leg, when fixed (decimal).
    pub rec_leg_rate: f64,
    /// Spread added to the pay leg's floating rate, basis points.
    pub pay_leg_spread_bp: f64,
    /// Spread added to the receive leg's floating rate, basis points.
    pub rec_leg_spread_bp: f64,
    /// Discounting methodology.
    pub discounting: Discounting,
    /// Date roll convention for the schedules.
    pub roll_convention: RollConvention,
    /// Business day adjustment for the schedules.
    pub business_day_adjustment: BusinessDayAdjustment,
    /// Emit initial and final principal exchanges.
    pub include_principal_exchanges: bool,
    /// Present coupon DFs rebased to the effective date (only with
    /// principal exchanges).
    pub discount_coupons_from_spot: bool,
}

impl SwapSpec {
    /// A spec with the common defaults: OIS discounting, no spreads, no
    /// principal exchanges.
    #[must_use]
    pub fn new(
        notional: f64,
        effective_date: Date,
        maturity_date: Date,
        pay_leg: SwapLegConvention,
        rec_leg: SwapLegConvention,
    ) -> Self {
        Self {
            notional,
            effective_date,
            maturity_date,
            pay_leg,
            rec_leg,
            pay_leg_rate: 0.0,
            rec_leg_rate: 0.0,
            pay_leg_spread_bp: 0.0,
            rec_leg_spread_bp: 0.0,
            discounting: Discounting::Ois,
            roll_convention: RollConvention::BackwardEom,
            business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
            include_principal_exchanges: false,
            discount_coupons_from_spot: false,
        }
    }

    /// Sets the fixed rate of the pay leg.
    #[must_use]
    pub fn with_pay_rate(mut self, rate: f64) -> Self {
        self.pay_leg_rate = rate;
        self
    }

    /// Sets the fixed rate of the receive leg.
    #[must_use]
    pub fn with_rec_rate(mut self, rate: f64) -> Self {
        self.rec_leg_rate = rate;
        self
    }

    /// Sets the receive-leg spread in basis points.
    #[must_use]
    pub fn with_rec_spread_bp(mut self, spread_bp: f64) -> Self {
        self.rec_leg_spread_bp = spread_bp;
        self
    }

    /// Sets the pay-leg spread in basis points.
    #[must_use]
    pub fn with_pay_spread_bp(mut self, spread_bp: f64) -> Self {
        self.pay_leg_spread_bp = spread_bp;
        self
    }

    /// Enables principal exchanges.
    #[must_use]
    pub fn with_principal_exchanges(mut self) -> Self {
        self.include_principal_exchanges = true;
        self
    }
}

/// One cashflow of a priced leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CouponCashflow {
    /// Period index: 1-based coupons, 0 for the initial principal, -1
    /// for the final principal.
    pub idx: i32,
    /// Adjusted accrual start.
    pub accrual_start: Date,
    /// Adjusted accrual end.
    pub accrual_end: Date,
    /// Rate reset date (floating coupons).
    pub reset_date: Option<Date>,
    /// Rate fixing date (floating coupons).
    pub fixing_date: Option<Date>,
    /// Payment date.
    pub payment_date: Date,
    /// Accrual fraction under the leg's day count.
    pub accrual_fraction: f64,
    /// Projected forward rate (floating coupons).
    pub forward_rate: Option<f64>,
    /// Fixed rate (fixed coupons).
    pub fixed_rate: Option<f64>,
    /// Discount factor applied to the payment.
    pub discount_factor: f64,
    /// Present value (signed).
    pub pv: f64,
    /// Notional behind this cashflow.
    pub notional: f64,
    /// Undiscounted payment amount (signed).
    pub payment: f64,
}

/// Present value of one leg with its cashflow breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct LegPv {
    /// Identifier of the leg convention.
    pub convention_id: String,
    /// Pay or receive.
    pub direction: Direction,
    /// Total leg PV (signed).
    pub pv: f64,
    /// The individual cashflows.
    pub cashflows: Vec<CouponCashflow>,
}

/// Present value of a swap.
#[derive(Debug, Clone, Serialize)]
pub struct SwapPv {
    /// Net PV: receive leg plus pay leg.
    pub pv_total: f64,
    /// The pay leg detail.
    pub pay_leg: LegPv,
    /// The receive leg detail.
    pub rec_leg: LegPv,
}
