//! Day count conventions.
//!
//! Day count conventions map a date interval to a year fraction. The
//! conventions this library needs are:
//!
//! - [`Act360`]: ACT/360 - money market legs, OIS fixed legs
//! - [`Act365Fixed`]: ACT/365F - KTB accrued interest, curve time axes
//! - [`Act360NoLeap`]: ACT/360A - actual days excluding Feb 29, over 360
//! - [`Thirty360E`]: 30E/360 - EUR fixed swap legs
//! - [`Thirty360US`]: 30U/360 - US bond basis
//! - [`ActActIsda`]: ACT/ACT ISDA - year-split actual/actual
//!
//! All implementations are pure functions of the two dates. String
//! lookups ([`DayCountConvention::from_str`]) exist only for the external
//! API edge; internal code passes the enum around.

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::{Act360, Act360NoLeap};
pub use act365::Act365Fixed;
pub use actact::ActActIsda;
pub use thirty360::{Thirty360E, Thirty360US};

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations are stateless, `Send + Sync`, and return year
/// fractions as `f64`. The year fraction is non-negative and zero iff
/// `start == end`; reversed intervals are swapped before counting.
pub trait DayCount: Send + Sync {
    /// Returns the convention name (e.g. `"ACT/360"`).
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Calculates the day count between two dates per the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of the supported day count conventions.
///
/// # Example
///
/// ```rust
/// use ficc_core::daycounts::{DayCount, DayCountConvention};
/// use ficc_core::types::Date;
///
/// let dc: DayCountConvention = "act/365f".parse().unwrap();
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2026, 1, 1).unwrap();
/// assert_eq!(dc.to_day_count().year_fraction(start, end), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    /// ACT/360
    Act360,
    /// ACT/365 Fixed
    Act365Fixed,
    /// ACT/360A - actual days excluding Feb 29, over 360
    Act360NoLeap,
    /// 30E/360 (Eurobond basis)
    Thirty360E,
    /// 30U/360 (US bond basis)
    Thirty360US,
    /// ACT/ACT ISDA
    ActActIsda,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Act360NoLeap => Box::new(Act360NoLeap),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
        }
    }

    /// Returns the conventional name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Act360NoLeap => "ACT/360A",
            DayCountConvention::Thirty360E => "30E/360",
            DayCountConvention::Thirty360US => "30U/360",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
        }
    }

    /// Calculates the year fraction without boxing.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::Act360NoLeap => Act360NoLeap.year_fraction(start, end),
            DayCountConvention::Thirty360E => Thirty360E.year_fraction(start, end),
            DayCountConvention::Thirty360US => Thirty360US.year_fraction(start, end),
            DayCountConvention::ActActIsda => ActActIsda.year_fraction(start, end),
        }
    }

    /// Returns all supported conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::Act360NoLeap,
            DayCountConvention::Thirty360E,
            DayCountConvention::Thirty360US,
            DayCountConvention::ActActIsda,
        ]
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a day count convention name, case-insensitively.
    ///
    /// Accepts the conventional names plus the common aliases seen in
    /// market data feeds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_uppercase();
        match normalized.trim() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACTUAL/365F" | "ACT365F" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT/360A" | "ACTUAL/360A" => Ok(DayCountConvention::Act360NoLeap),
            "30E/360" | "30/360E" | "30/360 EUROPEAN" | "EUROBOND" => {
                Ok(DayCountConvention::Thirty360E)
            }
            "30U/360" | "30/360" | "30/360 US" | "30/360 AMERICAN" | "BOND" => {
                Ok(DayCountConvention::Thirty360US)
            }
            "ACT/ACT" | "ACTUAL/ACTUAL" | "ACT/ACT ISDA" => Ok(DayCountConvention::ActActIsda),
            other => Err(CoreError::unsupported_convention(other)),
        }
    }
}

/// Puts a date interval into canonical order.
pub(crate) fn ordered(start: Date, end: Date) -> (Date, Date) {
    if end < start {
        log::debug!("swapping reversed day-count interval {start} / {end}");
        (end, start)
    } else {
        (start, end)
    }
}
