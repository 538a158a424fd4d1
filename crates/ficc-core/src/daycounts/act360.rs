//! ACT/360 family day count conventions.

use super::{ordered, DayCount};
use crate::types::Date;

/// ACT/360 day count convention.
///
/// Year fraction = actual days / 360. Money market convention, used by
/// EURIBOR floating legs and OIS fixed legs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let (start, end) = ordered(start, end);
        start.days_between(&end)
    }
}

/// ACT/360A (no-leap) day count convention.
///
/// Year fraction = (actual days - Feb 29 occurrences in `[start, end)`)
/// / 360.
#[derive(Debug, Clone, Copy, Default)]
pub struct Act360NoLeap;

impl DayCount for Act360NoLeap {
    fn name(&self) -> &'static str {
        "ACT/360A"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let (start, end) = ordered(start, end);
        let actual_days = start.days_between(&end);

        let mut leap_days = 0;
        for year in start.year()..=end.year() {
            if let Ok(feb29) = Date::from_ymd(year, 2, 29) {
                if start <= feb29 && feb29 < end {
                    leap_days += 1;
                }
            }
        }

        actual_days - leap_days
    }
}
