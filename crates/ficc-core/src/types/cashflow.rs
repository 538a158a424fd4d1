//! A dated cash amount.

use serde::{Deserialize, Serialize};

use super::Date;

/// A single cash flow: an amount paid on a date.
///
/// Bond cash flows are expressed in face-value units (the final flow
/// carries coupon plus principal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cashflow {
    /// Payment date.
    pub date: Date,
    /// Payment amount in face-value units.
    pub amount: f64,
}

impl Cashflow {
    /// Creates a new cash flow.
    #[must_use]
    pub fn new(date: Date, amount: f64) -> Self {
        Self { date, amount }
    }
}
