//! Date type for financial calculations.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// A calendar date for financial calculations.
///
/// This is a newtype wrapper around `chrono::NaiveDate` providing the
/// month arithmetic the schedule generators need: day-of-month
/// preservation with clamping, and the end-of-month rule used by swap
/// and bond schedules.
///
/// # Example
///
/// ```rust
/// use ficc_core::types::Date;
///
/// let date = Date::from_ymd(2025, 1, 31).unwrap();
/// assert_eq!(date.add_months(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the date is invalid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses a date from `YYYY-MM-DD` or compact `YYYYMMDD` form.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if neither format matches.
    pub fn parse(s: &str) -> CoreResult<Self> {
        for fmt in ["%Y-%m-%d", "%Y%m%d"] {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Ok(Date(d));
            }
        }
        Err(CoreError::invalid_date(format!("cannot parse: {s}")))
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the weekday.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Checks if the year is a leap year.
    #[must_use]
    pub fn is_leap_year(&self) -> bool {
        self.0.leap_year()
    }

    /// Returns the number of days in the date's month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// Returns the number of days in the date's year.
    #[must_use]
    pub fn days_in_year(&self) -> u32 {
        if self.is_leap_year() {
            366
        } else {
            365
        }
    }

    /// Returns true if this is the last calendar day of its month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == self.days_in_month()
    }

    /// Returns the last calendar day of this date's month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        Date(
            NaiveDate::from_ymd_opt(self.year(), self.month(), self.days_in_month())
                .expect("last day of month is always valid"),
        )
    }

    /// Adds a number of calendar days to the date.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a number of months to the date.
    ///
    /// The day-of-month is preserved, clamped to the last valid day of
    /// the target month (e.g., Jan 31 + 1 month = Feb 28/29).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;

        let max_day = days_in_month(new_year, new_month);
        let new_day = self.day().min(max_day);

        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds months applying the end-of-month rule.
    ///
    /// If this date is the last calendar day of its month, the result is
    /// the last calendar day of the target month; otherwise behaves like
    /// [`Date::add_months`].
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidDate` if the result is out of range.
    pub fn add_months_eom(&self, months: i32) -> CoreResult<Self> {
        let shifted = self.add_months(months)?;
        if self.is_end_of_month() {
            Ok(shifted.end_of_month())
        } else {
            Ok(shifted)
        }
    }

    /// Calculates the number of calendar days from this date to `other`.
    ///
    /// Negative if `other` is earlier.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Calculates whole calendar months from this date to `other`.
    #[must_use]
    pub fn months_between(&self, other: &Date) -> i32 {
        (other.year() - self.year()) * 12 + other.month() as i32 - self.month() as i32
    }

    /// Returns the underlying `chrono::NaiveDate`.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for Date {
    fn from(d: NaiveDate) -> Self {
        Date(d)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl std::str::FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Returns the number of days in the given month.
fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 1, 1).is_some_and(|d| d.leap_year()) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}
