//! Forward fixings off a projection curve.
//!
//! Produces the per-period EURIBOR forwards a floating leg would fix
//! at, with their fixing dates and accrual details; used by reset
//! reports and cashflow projections.

use serde::Serialize;

use ficc_core::daycounts::Act365Fixed;
use ficc_core::daycounts::DayCount;
use ficc_core::types::Date;
use ficc_curves::projection::ProjectionCurve;

use crate::conventions::{StubType, SwapLegConvention};
use crate::error::{SwapError, SwapResult};
use crate::schedule::{stub_schedule_dates, BootstrapPeriod};

/// One projected fixing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForwardFixing {
    /// Date the rate fixes.
    pub fixing_date: Date,
    /// Adjusted accrual start.
    pub accrual_start: Date,
    /// Adjusted accrual end.
    pub accrual_end: Date,
    /// Simple forward rate in percent.
    pub forward_rate_percent: f64,
    /// Accrual fraction under the leg's day count.
    pub year_fraction: f64,
}

/// Projects the forward fixings for a floating leg.
///
/// The schedule runs at the leg's reset frequency with a long final
/// stub; degenerate periods are skipped. Fixing dates move back from
/// the accrual start by the leg's fixing lag.
///
/// # Errors
///
/// Returns an error when the leg has no reset frequency or the
/// schedule cannot be built.
pub fn forward_fixings(
    effective_date: Date,
    maturity_date: Date,
    convention: &SwapLegConvention,
    curve: &ProjectionCurve,
) -> SwapResult<Vec<ForwardFixing>> {
    let Some(reset_frequency) = convention.reset_frequency else {
        return Err(SwapError::schedule(
            convention.id(),
            "forward fixings require a reset frequency",
        ));
    };

    let dates = stub_schedule_dates(
        effective_date,
        maturity_date,
        reset_frequency,
        StubType::LongFinal,
    )?;

    let mut fixings = Vec::with_capacity(dates.len().saturating_sub(1));
    let mut prev_end_adj: Option<Date> = None;
    for window in dates.windows(2) {
        let accrual_start = match prev_end_adj {
            Some(prev) => prev,
            None => convention
                .calendar
                .adjust(window[0], convention.business_day_adjustment)?,
        };
        let accrual_end = convention
            .calendar
            .adjust(window[1], convention.business_day_adjustment)?;
        prev_end_adj = Some(accrual_end);

        let period = BootstrapPeriod {
            accrual_start,
            accrual_end,
            year_fraction: convention.day_count.year_fraction(accrual_start, accrual_end),
        };
        if period.year_fraction <= 1e-9 {
            continue;
        }

        let fixing_date = if convention.fixing_lag_days > 0 {
            convention
                .calendar
                .add_business_days(accrual_start, -convention.fixing_lag_days)
        } else {
            accrual_start
        };

        let time = |d: Date| Act365Fixed.year_fraction(curve.reference_date(), d);
        let px_start = curve.px(time(period.accrual_start));
        let px_end = curve.px(time(period.accrual_end));
        if px_start <= 0.0 || px_end <= 0.0 {
            return Err(SwapError::invalid_input(format!(
                "non-positive pseudo-discount factor in period ending {accrual_end}"
            )));
        }

        let forward = (px_start / px_end - 1.0) / period.year_fraction;
        fixings.push(ForwardFixing {
            fixing_date,
            accrual_start: period.accrual_start,
            accrual_end: period.accrual_end,
            forward_rate_percent: forward * 100.0,
            year_fraction: period.year_fraction,
        });
    }

    Ok(fixings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{eur_irs_fixed, euribor_6m_floating};
    use approx::assert_relative_eq;
    use ficc_core::calendars::{Calendar, WeekendCalendar};
    use std::sync::Arc;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn cal() -> Arc<dyn Calendar> {
        Arc::new(WeekendCalendar)
    }

    fn flat_curve() -> ProjectionCurve {
        ProjectionCurve::flat(d("2025-08-08"), "EUR-EURIBOR6M", 0.033, 40.0).unwrap()
    }

    #[test]
    fn test_fixing_rows_shape() {
        let convention = euribor_6m_floating(cal());
        let fixings =
            forward_fixings(d("2025-08-12"), d("2030-08-12"), &convention, &flat_curve()).unwrap();
        assert_eq!(fixings.len(), 10);
        for row in &fixings {
            assert!(row.fixing_date < row.accrual_start);
            assert!(row.accrual_end > row.accrual_start);
            assert!(row.year_fraction > 0.4 && row.year_fraction < 0.6);
            // Percent units around the 3.3% curve level
            assert!(row.forward_rate_percent > 3.2 && row.forward_rate_percent < 3.5);
        }
    }

    #[test]
    fn test_fixing_lag() {
        let convention = euribor_6m_floating(cal());
        let fixings =
            forward_fixings(d("2025-08-12"), d("2027-08-12"), &convention, &flat_curve()).unwrap();
        for row in &fixings {
            assert_eq!(
                convention
                    .calendar
                    .business_days_between(row.fixing_date, row.accrual_start),
                2
            );
        }
    }

    #[test]
    fn test_forward_matches_curve_quotient() {
        let convention = euribor_6m_floating(cal());
        let curve = flat_curve();
        let fixings =
            forward_fixings(d("2025-08-12"), d("2027-08-12"), &convention, &curve).unwrap();
        let row = &fixings[0];
        let expected = curve
            .forward(row.accrual_start, row.accrual_end, row.year_fraction)
            .unwrap();
        assert_relative_eq!(row.forward_rate_percent, expected * 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fixed_leg_rejected() {
        let convention = eur_irs_fixed(cal());
        assert!(
            forward_fixings(d("2025-08-12"), d("2027-08-12"), &convention, &flat_curve()).is_err()
        );
    }
}
