//! Tenor strings of the quote grammar (`1W`, `3M`, `10Y`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};

/// The unit of a tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenorUnit {
    /// Calendar days.
    Days,
    /// Calendar weeks.
    Weeks,
    /// Months.
    Months,
    /// Years.
    Years,
}

/// A market tenor: an integer count of days, weeks, months, or years.
///
/// Parsed from the quote grammar `<int><D|W|M|Y>` (case-insensitive).
///
/// # Example
///
/// ```rust
/// use ficc_core::types::Tenor;
///
/// let t: Tenor = "10Y".parse().unwrap();
/// assert_eq!(t.months(), Some(120));
/// assert!(!t.is_short());
/// assert!("1w".parse::<Tenor>().unwrap().is_short());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tenor {
    count: u32,
    unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor from a count and unit.
    #[must_use]
    pub fn new(count: u32, unit: TenorUnit) -> Self {
        Self { count, unit }
    }

    /// Parses a tenor string (`5D`, `2W`, `6M`, `30Y`; case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidTenor` if the string does not match the
    /// grammar.
    pub fn parse(s: &str) -> CoreResult<Self> {
        let t = s.trim();
        if t.len() < 2 {
            return Err(CoreError::invalid_tenor(s));
        }
        let (num, unit) = t.split_at(t.len() - 1);
        let count: u32 = num
            .parse()
            .map_err(|_| CoreError::invalid_tenor(s))?;
        let unit = match unit.to_ascii_uppercase().as_str() {
            "D" => TenorUnit::Days,
            "W" => TenorUnit::Weeks,
            "M" => TenorUnit::Months,
            "Y" => TenorUnit::Years,
            _ => return Err(CoreError::invalid_tenor(s)),
        };
        Ok(Self { count, unit })
    }

    /// Returns the unit count.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the unit.
    #[must_use]
    pub fn unit(&self) -> TenorUnit {
        self.unit
    }

    /// Number of months, for month- and year-denominated tenors.
    #[must_use]
    pub fn months(&self) -> Option<i32> {
        match self.unit {
            TenorUnit::Months => Some(self.count as i32),
            TenorUnit::Years => Some(self.count as i32 * 12),
            _ => None,
        }
    }

    /// Number of calendar days, for day- and week-denominated tenors.
    #[must_use]
    pub fn days(&self) -> Option<i64> {
        match self.unit {
            TenorUnit::Days => Some(i64::from(self.count)),
            TenorUnit::Weeks => Some(i64::from(self.count) * 7),
            _ => None,
        }
    }

    /// True for tenors of at most one year (single-coupon instruments).
    #[must_use]
    pub fn is_short(&self) -> bool {
        match self.unit {
            TenorUnit::Days | TenorUnit::Weeks => true,
            TenorUnit::Months => self.count <= 12,
            TenorUnit::Years => self.count <= 1,
        }
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TenorUnit::Days => 'D',
            TenorUnit::Weeks => 'W',
            TenorUnit::Months => 'M',
            TenorUnit::Years => 'Y',
        };
        write!(f, "{}{}", self.count, unit)
    }
}

impl std::str::FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Tenor {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Tenor> for String {
    fn from(t: Tenor) -> Self {
        t.to_string()
    }
}
