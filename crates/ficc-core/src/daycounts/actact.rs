//! Actual/Actual ISDA day count convention.

use super::{ordered, DayCount};
use crate::types::Date;

/// ACT/ACT ISDA day count convention.
///
/// The interval is split at year boundaries; days in non-leap years
/// accrue over 365, days in leap years over 366.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActActIsda;

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        let (start, end) = ordered(start, end);
        if start == end {
            return 0.0;
        }

        let mut total = 0.0;
        let mut current = start;

        while current.year() < end.year() {
            let next_jan1 = Date::from_ymd(current.year() + 1, 1, 1)
                .expect("January 1st is always valid");
            let days = current.days_between(&next_jan1);
            total += days as f64 / f64::from(current.days_in_year());
            current = next_jan1;
        }

        if current < end {
            let days = current.days_between(&end);
            total += days as f64 / f64::from(current.days_in_year());
        }

        total
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let (start, end) = ordered(start, end);
        start.days_between(&end)
    }
}
