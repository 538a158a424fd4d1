//! The Korean Treasury Bond instrument.

use serde::{Deserialize, Serialize};

use ficc_core::types::{Cashflow, Date};

use crate::error::{BondError, BondResult};

/// Default KTB face value.
pub const DEFAULT_FACE: f64 = 10_000.0;

/// A Korean Treasury Bond.
///
/// Semiannual coupons by default, 10,000 face. The coupon is quoted in
/// percent (e.g. 2.75 for 2.75%), matching market convention; the
/// decimal form is available as [`Ktb::coupon_rate`].
///
/// # Example
///
/// ```rust
/// use ficc_bonds::Ktb;
/// use ficc_core::types::Date;
///
/// let bond = Ktb::new(
///     Date::parse("2020-03-10").unwrap(),
///     Date::parse("2030-03-10").unwrap(),
///     2.75,
/// )
/// .unwrap();
/// assert_eq!(bond.payment_schedule().len(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ktb {
    issue: Date,
    maturity: Date,
    coupon_percent: f64,
    payments_per_year: u32,
    face: f64,
}

impl Ktb {
    /// Creates a semiannual KTB with the default face value.
    ///
    /// # Errors
    ///
    /// Returns an error when maturity is not after issue or the coupon
    /// is negative.
    pub fn new(issue: Date, maturity: Date, coupon_percent: f64) -> BondResult<Self> {
        Self::with_conventions(issue, maturity, coupon_percent, 2, DEFAULT_FACE)
    }

    /// Creates a KTB with explicit payment frequency and face value.
    ///
    /// `payments_per_year` must divide 12 evenly (1, 2, 3, 4, 6, or 12).
    ///
    /// # Errors
    ///
    /// Returns an error when maturity is not after issue, the coupon is
    /// negative, the frequency is zero or does not divide the year, or
    /// the face is not positive.
    pub fn with_conventions(
        issue: Date,
        maturity: Date,
        coupon_percent: f64,
        payments_per_year: u32,
        face: f64,
    ) -> BondResult<Self> {
        if maturity <= issue {
            return Err(BondError::invalid_spec(format!(
                "maturity {maturity} must be after issue {issue}"
            )));
        }
        if coupon_percent < 0.0 {
            return Err(BondError::invalid_spec("coupon rate must be non-negative"));
        }
        if payments_per_year == 0 || 12 % payments_per_year != 0 {
            return Err(BondError::invalid_spec(format!(
                "payments_per_year {payments_per_year} must divide 12"
            )));
        }
        if face <= 0.0 {
            return Err(BondError::invalid_spec("face value must be positive"));
        }
        Ok(Self {
            issue,
            maturity,
            coupon_percent,
            payments_per_year,
            face,
        })
    }

    /// The issue date.
    #[must_use]
    pub fn issue(&self) -> Date {
        self.issue
    }

    /// The maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// The coupon rate in percent.
    #[must_use]
    pub fn coupon_percent(&self) -> f64 {
        self.coupon_percent
    }

    /// The coupon rate as a decimal.
    #[must_use]
    pub fn coupon_rate(&self) -> f64 {
        self.coupon_percent / 100.0
    }

    /// Coupon payments per year.
    #[must_use]
    pub fn payments_per_year(&self) -> u32 {
        self.payments_per_year
    }

    /// Months between coupons.
    #[must_use]
    pub fn coupon_spacing_months(&self) -> i32 {
        (12 / self.payments_per_year) as i32
    }

    /// The face value.
    #[must_use]
    pub fn face(&self) -> f64 {
        self.face
    }

    /// The per-period coupon amount.
    #[must_use]
    pub fn coupon_amount(&self) -> f64 {
        self.face * self.coupon_rate() / f64::from(self.payments_per_year)
    }

    /// Coupon payment dates, anchored to the issue date.
    ///
    /// Dates step from issue in coupon-spacing months, preserving the
    /// issue's day-of-month under the end-of-month rule. The final date
    /// is always the maturity, as a stub when the grid does not land on
    /// it exactly.
    #[must_use]
    pub fn payment_schedule(&self) -> Vec<Date> {
        let spacing = self.coupon_spacing_months();
        let mut dates = Vec::new();
        let mut k = 1;
        loop {
            // Anchor every step to the issue date so the day-of-month
            // never drifts through short months.
            let Ok(date) = self.issue.add_months_eom(spacing * k) else {
                break;
            };
            if date < self.maturity {
                dates.push(date);
                k += 1;
            } else {
                dates.push(self.maturity);
                break;
            }
        }
        if dates.is_empty() {
            dates.push(self.maturity);
        }
        dates
    }

    /// Cash flows per payment date; the final flow adds the principal.
    #[must_use]
    pub fn cash_flows(&self) -> Vec<Cashflow> {
        let dates = self.payment_schedule();
        let coupon = self.coupon_amount();
        let last = dates.len() - 1;

        dates
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let amount = if i == last { self.face + coupon } else { coupon };
                Cashflow::new(date, amount)
            })
            .collect()
    }

    /// The payment dates straddling `as_of`: the latest payment (or
    /// issue) on or before it, and the earliest strictly after it.
    ///
    /// Past the final payment both dates are the final payment.
    #[must_use]
    pub fn adjacent_payment_dates(&self, as_of: Date) -> (Date, Date) {
        let dates = self.payment_schedule();

        if as_of < dates[0] {
            return (self.issue, dates[0]);
        }
        for (i, &date) in dates.iter().enumerate() {
            if date > as_of {
                let prev = if i > 0 { dates[i - 1] } else { self.issue };
                return (prev, date);
            }
        }
        let last = *dates.last().expect("schedule is never empty");
        (last, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn sample_bond() -> Ktb {
        Ktb::new(d("2020-03-10"), d("2030-03-10"), 2.75).unwrap()
    }

    #[test]
    fn test_validation() {
        assert!(Ktb::new(d("2030-03-10"), d("2020-03-10"), 2.75).is_err());
        assert!(Ktb::new(d("2020-03-10"), d("2020-03-10"), 2.75).is_err());
        assert!(Ktb::new(d("2020-03-10"), d("2030-03-10"), -1.0).is_err());
        assert!(Ktb::with_conventions(d("2020-03-10"), d("2030-03-10"), 2.75, 5, 10_000.0).is_err());
        assert!(Ktb::with_conventions(d("2020-03-10"), d("2030-03-10"), 2.75, 2, 0.0).is_err());
    }

    #[test]
    fn test_schedule_regular() {
        let bond = sample_bond();
        let dates = bond.payment_schedule();
        assert_eq!(dates.len(), 20);
        assert_eq!(dates[0], d("2020-09-10"));
        assert_eq!(dates[1], d("2021-03-10"));
        assert_eq!(*dates.last().unwrap(), d("2030-03-10"));
    }

    #[test]
    fn test_schedule_enforces_maturity() {
        // Maturity off the coupon grid: the final period is a stub
        let bond = Ktb::new(d("2020-03-10"), d("2030-01-15"), 2.75).unwrap();
        let dates = bond.payment_schedule();
        assert_eq!(*dates.last().unwrap(), d("2030-01-15"));
        assert_eq!(dates[dates.len() - 2], d("2029-09-10"));
    }

    #[test]
    fn test_schedule_eom_anchoring() {
        // Issued at month end: coupons stay at month ends
        let bond = Ktb::new(d("2021-08-31"), d("2024-08-31"), 3.0).unwrap();
        let dates = bond.payment_schedule();
        assert_eq!(dates[0], d("2022-02-28"));
        assert_eq!(dates[1], d("2022-08-31"));
        // Leap-year February
        assert_eq!(dates[4], d("2024-02-29"));
    }

    #[test]
    fn test_cash_flows() {
        let bond = sample_bond();
        let flows = bond.cash_flows();
        assert_eq!(flows.len(), 20);
        // 10_000 * 2.75% / 2
        assert!((flows[0].amount - 137.5).abs() < 1e-12);
        assert!((flows[19].amount - 10_137.5).abs() < 1e-12);
    }

    #[test]
    fn test_adjacent_payment_dates() {
        let bond = sample_bond();
        // Before the first coupon
        assert_eq!(
            bond.adjacent_payment_dates(d("2020-05-01")),
            (d("2020-03-10"), d("2020-09-10"))
        );
        // Mid-life
        assert_eq!(
            bond.adjacent_payment_dates(d("2023-09-01")),
            (d("2023-03-10"), d("2023-09-10"))
        );
        // Exactly on a coupon date: that date is the period start
        assert_eq!(
            bond.adjacent_payment_dates(d("2023-09-10")),
            (d("2023-09-10"), d("2024-03-10"))
        );
        // Past maturity
        assert_eq!(
            bond.adjacent_payment_dates(d("2031-01-01")),
            (d("2030-03-10"), d("2030-03-10"))
        );
    }
}
