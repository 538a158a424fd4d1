//! Payment and reset frequencies.

use serde::{Deserialize, Serialize};

/// Payment or reset frequency of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Annual payments (12 months).
    Annual,
    /// Semi-annual payments (6 months).
    SemiAnnual,
    /// Quarterly payments (3 months).
    Quarterly,
    /// Monthly payments (1 month).
    Monthly,
    /// Daily resets (overnight legs); not a payment frequency.
    Daily,
}

impl Frequency {
    /// Months per period, if the frequency is month-denominated.
    #[must_use]
    pub fn months(&self) -> Option<i32> {
        match self {
            Frequency::Annual => Some(12),
            Frequency::SemiAnnual => Some(6),
            Frequency::Quarterly => Some(3),
            Frequency::Monthly => Some(1),
            Frequency::Daily => None,
        }
    }

    /// Periods per year, if the frequency is month-denominated.
    #[must_use]
    pub fn per_year(&self) -> Option<u32> {
        self.months().map(|m| (12 / m) as u32)
    }
}
