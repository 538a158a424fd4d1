//! Business day adjustment conventions.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

use super::Calendar;

/// Business day adjustment rules applied to schedule dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessDayAdjustment {
    /// Leave the date unadjusted.
    NoAdjustment,
    /// Roll forward to the next business day.
    Following,
    /// Roll forward; if the month changes, roll backward instead.
    ModifiedFollowing,
    /// Roll backward to the previous business day.
    Preceding,
    /// Roll backward; if the month changes, roll forward instead.
    ModifiedPreceding,
}

impl std::str::FromStr for BusinessDayAdjustment {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().trim() {
            "NO_ADJUSTMENT" | "UNADJUSTED" | "NONE" => Ok(Self::NoAdjustment),
            "FOLLOWING" => Ok(Self::Following),
            "MODIFIED_FOLLOWING" | "MODFOLLOWING" => Ok(Self::ModifiedFollowing),
            "PRECEDING" => Ok(Self::Preceding),
            "MODIFIED_PRECEDING" | "MODPRECEDING" => Ok(Self::ModifiedPreceding),
            other => Err(CoreError::unsupported_convention(other)),
        }
    }
}

/// Applies a business day adjustment under the given calendar.
pub(super) fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayAdjustment,
    calendar: &C,
) -> CoreResult<Date> {
    let roll = |mut d: Date, step: i64| {
        while !calendar.is_business_day(d) {
            d = d.add_days(step);
        }
        d
    };

    let adjusted = match convention {
        BusinessDayAdjustment::NoAdjustment => date,
        BusinessDayAdjustment::Following => roll(date, 1),
        BusinessDayAdjustment::Preceding => roll(date, -1),
        BusinessDayAdjustment::ModifiedFollowing => {
            let forward = roll(date, 1);
            if forward.month() == date.month() {
                forward
            } else {
                roll(date, -1)
            }
        }
        BusinessDayAdjustment::ModifiedPreceding => {
            let backward = roll(date, -1);
            if backward.month() == date.month() {
                backward
            } else {
                roll(date, 1)
            }
        }
    };

    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::WeekendCalendar;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    #[test]
    fn test_following() {
        let cal = WeekendCalendar;
        // Saturday 2025-05-31 -> Monday 2025-06-02
        let adj = cal.adjust(d("2025-05-31"), BusinessDayAdjustment::Following).unwrap();
        assert_eq!(adj, d("2025-06-02"));
    }

    #[test]
    fn test_modified_following_rolls_back_at_month_end() {
        let cal = WeekendCalendar;
        // Saturday 2025-05-31: following crosses into June, so roll back to Friday
        let adj = cal
            .adjust(d("2025-05-31"), BusinessDayAdjustment::ModifiedFollowing)
            .unwrap();
        assert_eq!(adj, d("2025-05-30"));
        // Mid-month Saturday behaves like plain following
        let adj = cal
            .adjust(d("2025-05-10"), BusinessDayAdjustment::ModifiedFollowing)
            .unwrap();
        assert_eq!(adj, d("2025-05-12"));
    }

    #[test]
    fn test_modified_preceding_rolls_forward_at_month_start() {
        let cal = WeekendCalendar;
        // Sunday 2025-06-01: preceding crosses into May, so roll forward
        let adj = cal
            .adjust(d("2025-06-01"), BusinessDayAdjustment::ModifiedPreceding)
            .unwrap();
        assert_eq!(adj, d("2025-06-02"));
    }

    #[test]
    fn test_no_adjustment() {
        let cal = WeekendCalendar;
        let adj = cal.adjust(d("2025-05-31"), BusinessDayAdjustment::NoAdjustment).unwrap();
        assert_eq!(adj, d("2025-05-31"));
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "modified_following".parse::<BusinessDayAdjustment>().unwrap(),
            BusinessDayAdjustment::ModifiedFollowing
        );
        assert!("SOMETHING".parse::<BusinessDayAdjustment>().is_err());
    }
}
