//! Quote schema and tenor date arithmetic.

use std::sync::Arc;

use ficc_core::calendars::{BusinessDayAdjustment, Calendar};
use ficc_core::error::CoreResult;
use ficc_core::types::{Date, Tenor};

use crate::conventions::{DepositConvention, SwapLegConvention};

/// The instrument convention behind a quote.
#[derive(Debug, Clone)]
pub enum InstrumentConvention {
    /// A money-market deposit.
    Deposit(DepositConvention),
    /// A par swap quoted against this floating leg.
    SwapLeg(SwapLegConvention),
}

/// A market quote: tenor, rate, and the instrument it belongs to.
///
/// Rates may arrive in percent or decimal; [`Quote::normalized_rate`]
/// applies the bootstrap edge rule (magnitude >= 1 means percent).
#[derive(Debug, Clone)]
pub struct Quote {
    /// The quoted tenor.
    pub tenor: Tenor,
    /// The quoted rate, percent or decimal.
    pub rate: f64,
    /// The instrument convention.
    pub instrument: InstrumentConvention,
}

impl Quote {
    /// Creates a deposit quote.
    #[must_use]
    pub fn deposit(tenor: Tenor, rate: f64, convention: DepositConvention) -> Self {
        Self {
            tenor,
            rate,
            instrument: InstrumentConvention::Deposit(convention),
        }
    }

    /// Creates a par-swap quote against a floating leg convention.
    #[must_use]
    pub fn swap(tenor: Tenor, rate: f64, floating_leg: SwapLegConvention) -> Self {
        Self {
            tenor,
            rate,
            instrument: InstrumentConvention::SwapLeg(floating_leg),
        }
    }

    /// The rate as a decimal: values with magnitude >= 1 divide by 100.
    #[must_use]
    pub fn normalized_rate(&self) -> f64 {
        normalize_rate(self.rate)
    }
}

/// The percent/decimal normalization used at the bootstrap edge.
#[must_use]
pub fn normalize_rate(rate: f64) -> f64 {
    if rate.abs() >= 1.0 {
        rate / 100.0
    } else {
        rate
    }
}

/// Spot date: the trade date advanced by the settlement lag.
#[must_use]
pub fn spot_date(trade_date: Date, calendar: &Arc<dyn Calendar>, spot_lag: i32) -> Date {
    calendar.add_business_days(trade_date, spot_lag)
}

/// Adds whole months with the end-of-month rule, then adjusts.
///
/// # Errors
///
/// Propagates date-range errors.
pub fn add_tenor_months(
    start: Date,
    months: i32,
    calendar: &Arc<dyn Calendar>,
    adjustment: BusinessDayAdjustment,
    end_of_month_rule: bool,
) -> CoreResult<Date> {
    let unadjusted = if end_of_month_rule {
        start.add_months_eom(months)?
    } else {
        start.add_months(months)?
    };
    calendar.adjust(unadjusted, adjustment)
}

/// Maturity date for a tenor quoted off `curve_date`.
///
/// Day/week tenors add calendar days to spot; month/year tenors use
/// month arithmetic with the end-of-month rule and business day
/// adjustment.
///
/// # Errors
///
/// Propagates date-range errors.
pub fn maturity_for_tenor(
    curve_date: Date,
    tenor: Tenor,
    calendar: &Arc<dyn Calendar>,
    spot_lag: i32,
    adjustment: BusinessDayAdjustment,
) -> CoreResult<Date> {
    let spot = spot_date(curve_date, calendar, spot_lag);
    if let Some(days) = tenor.days() {
        return Ok(spot.add_days(days));
    }
    let months = tenor.months().expect("tenor is days or months");
    add_tenor_months(spot, months, calendar, adjustment, true)
}

/// Annual payment dates from spot through the tenor maturity:
/// `[spot, spot+12M, ..., maturity]`.
///
/// # Errors
///
/// Propagates date-range errors.
pub fn annual_payment_dates(
    curve_date: Date,
    tenor: Tenor,
    calendar: &Arc<dyn Calendar>,
    spot_lag: i32,
    adjustment: BusinessDayAdjustment,
) -> CoreResult<Vec<Date>> {
    let spot = spot_date(curve_date, calendar, spot_lag);
    let maturity = maturity_for_tenor(curve_date, tenor, calendar, spot_lag, adjustment)?;

    let mut dates = vec![spot];
    let mut current = spot;
    loop {
        let next = add_tenor_months(current, 12, calendar, adjustment, true)?;
        if next >= maturity {
            dates.push(maturity);
            break;
        }
        dates.push(next);
        current = next;
    }
    Ok(dates)
}
