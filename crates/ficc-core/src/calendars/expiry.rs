//! KTB futures expiry dates.
//!
//! KRX 3/10/30-year KTB futures expire on the third Tuesday of the
//! quarter months (Mar/Jun/Sep/Dec), rolled back to the prior business
//! day when that Tuesday is a holiday.

use chrono::Weekday;

use crate::error::CoreResult;
use crate::types::Date;

use super::Calendar;

/// Returns the expiry-rule third Tuesday for the month of `anchor`.
///
/// The first Tuesday on or after the 15th, rolled back to the previous
/// business day when it falls on a holiday.
///
/// # Errors
///
/// Propagates date-construction errors.
pub fn third_tuesday<C: Calendar + ?Sized>(anchor: Date, calendar: &C) -> CoreResult<Date> {
    let mut d = Date::from_ymd(anchor.year(), anchor.month(), 15)?;
    while d.weekday() != Weekday::Tue {
        d = d.add_days(1);
    }
    while !calendar.is_business_day(d) {
        d = d.add_days(-1);
    }
    Ok(d)
}

/// Returns the current and next quarterly futures expiries for a trade date.
///
/// If the trade date lies in a quarter month and strictly before that
/// month's expiry, the pair is (this quarter, next quarter). Past the
/// expiry, or in a non-quarter month, the pair skips to the next two
/// quarterly expiries.
///
/// # Errors
///
/// Propagates date-construction errors.
pub fn futures_termination_dates<C: Calendar + ?Sized>(
    trade_date: Date,
    calendar: &C,
) -> CoreResult<(Date, Date)> {
    let this_month = third_tuesday(trade_date, calendar)?;

    if matches!(this_month.month(), 3 | 6 | 9 | 12) {
        if trade_date < this_month {
            let next = third_tuesday(this_month.add_months(3)?, calendar)?;
            Ok((this_month, next))
        } else {
            let first = third_tuesday(this_month.add_months(3)?, calendar)?;
            let second = third_tuesday(this_month.add_months(6)?, calendar)?;
            Ok((first, second))
        }
    } else {
        // Advance to the next quarter month
        let mut anchor = this_month;
        while anchor.month() % 3 != 0 {
            anchor = anchor.add_months(1)?;
        }
        let first = third_tuesday(anchor, calendar)?;
        let second = third_tuesday(anchor.add_months(3)?, calendar)?;
        Ok((first, second))
    }
}
