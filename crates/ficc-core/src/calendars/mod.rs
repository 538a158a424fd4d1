//! Business day calendars and conventions.
//!
//! The core consumes a [`Calendar`] capability (business-day predicate and
//! arithmetic) and a holiday set supplied by the caller; holiday data
//! ingestion itself lives outside the library.

mod conventions;
mod expiry;

pub use conventions::BusinessDayAdjustment;
pub use expiry::{futures_termination_dates, third_tuesday};

use chrono::Weekday;
use std::collections::BTreeSet;

use crate::error::CoreResult;
use crate::types::Date;

/// Trait for business day calendars.
///
/// Calendars determine which days are business days for a market.
/// Implementations must be `Send + Sync`: conventions hold them behind
/// shared pointers and pricing may run across threads.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Returns true if the date is a weekend or holiday.
    fn is_holiday(&self, date: Date) -> bool {
        !self.is_business_day(date)
    }

    /// Adjusts a date according to the given business day convention.
    ///
    /// # Errors
    ///
    /// Propagates date-range errors from the underlying arithmetic.
    fn adjust(&self, date: Date, convention: BusinessDayAdjustment) -> CoreResult<Date> {
        conventions::adjust(date, convention, self)
    }

    /// Advances a date by `days` business days (sign gives direction).
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let mut result = date;
        let mut remaining = days.abs();
        let direction: i64 = if days >= 0 { 1 } else { -1 };

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Returns the next business day strictly after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        self.add_business_days(date, 1)
    }

    /// Returns the previous business day strictly before the given date.
    fn previous_business_day(&self, date: Date) -> Date {
        self.add_business_days(date, -1)
    }

    /// Counts business days in `(start, end]`.
    fn business_days_between(&self, start: Date, end: Date) -> i32 {
        let mut count = 0;
        let mut current = start.add_days(1);

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        count
    }
}

/// A weekend-only calendar (no holidays).
///
/// Useful for tests or when holiday data is not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "WEEKEND"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// A calendar built from an explicit holiday list.
///
/// A date is a business day when it is neither a weekend nor in the
/// holiday set. This is the injection point for externally sourced
/// holiday data (KRX, TARGET, ...).
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    name: String,
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar from a name and a holiday list.
    #[must_use]
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Creates a calendar from ISO `YYYY-MM-DD` holiday strings.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` on the first unparsable entry.
    pub fn from_iso_dates<'a>(
        name: impl Into<String>,
        holidays: impl IntoIterator<Item = &'a str>,
    ) -> CoreResult<Self> {
        let parsed = holidays
            .into_iter()
            .map(Date::parse)
            .collect::<CoreResult<BTreeSet<_>>>()?;
        Ok(Self {
            name: name.into(),
            holidays: parsed,
        })
    }

    /// Number of holidays loaded.
    #[must_use]
    pub fn holiday_count(&self) -> usize {
        self.holidays.len()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn test_weekend_calendar() {
        let cal = WeekendCalendar;
        assert!(cal.is_business_day(d("2025-10-29"))); // Wednesday
        assert!(!cal.is_business_day(d("2025-10-25"))); // Saturday
        assert!(!cal.is_business_day(d("2025-10-26"))); // Sunday
    }

    #[test]
    fn test_holiday_calendar() {
        let cal = HolidayCalendar::from_iso_dates("KRX", ["2025-10-03", "2025-10-06"]).unwrap();
        assert_eq!(cal.holiday_count(), 2);
        assert!(!cal.is_business_day(d("2025-10-03"))); // Friday holiday
        assert!(!cal.is_business_day(d("2025-10-06"))); // Monday holiday
        assert!(cal.is_business_day(d("2025-10-07")));
    }

    #[test]
    fn test_add_business_days() {
        let cal = WeekendCalendar;
        // Friday + 1 business day = Monday
        assert_eq!(cal.add_business_days(d("2025-10-24"), 1), d("2025-10-27"));
        // Monday - 1 business day = Friday
        assert_eq!(cal.add_business_days(d("2025-10-27"), -1), d("2025-10-24"));
        // Zero is a no-op
        assert_eq!(cal.add_business_days(d("2025-10-27"), 0), d("2025-10-27"));
    }

    #[test]
    fn test_add_business_days_over_holiday() {
        let cal = HolidayCalendar::from_iso_dates("TEST", ["2025-10-27"]).unwrap();
        // Friday + 1 business day skips the Monday holiday
        assert_eq!(cal.add_business_days(d("2025-10-24"), 1), d("2025-10-28"));
    }

    #[test]
    fn test_business_days_between() {
        let cal = WeekendCalendar;
        // Mon..Fri inclusive of end, exclusive of start
        assert_eq!(cal.business_days_between(d("2025-10-27"), d("2025-10-31")), 4);
        // Across a weekend
        assert_eq!(cal.business_days_between(d("2025-10-24"), d("2025-10-28")), 2);
    }
}
