//! KTB futures: forward yields and basket fair value.
//!
//! KRX KTB futures cash-settle against a basket of underlying bonds.
//! Each underlying's market price rolls forward to the futures expiry at
//! the 91-day CD rate; the yield that reproduces that forward price at
//! expiry is the bond's forward yield, and the fair value prices a
//! synthetic 5%-coupon notional bond at the basket's average forward
//! yield.

use std::sync::Arc;

use ficc_core::calendars::{futures_termination_dates, Calendar};
use ficc_core::types::Date;
use ficc_math::solvers::{
    bisect, newton_with_bisection, BisectionConfig, NewtonConfig,
};

use crate::bond::Ktb;
use crate::error::{BondError, BondResult};
use crate::pricing::street_price_and_derivative;

/// Days-in-year basis of the CD money-market carry.
const CD_BASIS: f64 = 365.0;

/// Seeds tried, in order, when the primary forward-yield solves fail.
const FALLBACK_SEEDS: [f64; 7] = [0.005, 0.01, 0.02, 0.03, 0.05, 0.08, 0.12];

/// An underlying bond of a futures basket, with its market yield.
#[derive(Debug, Clone, PartialEq)]
pub struct UnderlyingBond {
    /// Issue date.
    pub issue: Date,
    /// Maturity date.
    pub maturity: Date,
    /// Coupon rate in percent.
    pub coupon_percent: f64,
    /// Market yield in percent.
    pub market_yield_percent: f64,
}

impl UnderlyingBond {
    /// Creates an underlying.
    #[must_use]
    pub fn new(
        issue: Date,
        maturity: Date,
        coupon_percent: f64,
        market_yield_percent: f64,
    ) -> Self {
        Self {
            issue,
            maturity,
            coupon_percent,
            market_yield_percent,
        }
    }
}

/// The deliverable basket of one futures contract (up to three bonds).
#[derive(Debug, Clone, Default)]
pub struct FuturesBasket {
    /// The underlying bonds.
    pub underlyings: Vec<UnderlyingBond>,
}

impl FuturesBasket {
    /// Creates a basket from underlyings.
    #[must_use]
    pub fn new(underlyings: Vec<UnderlyingBond>) -> Self {
        Self { underlyings }
    }
}

/// The futures pricing engine: valuation date, CD carry rate, calendar.
pub struct FuturesEngine {
    valuation_date: Date,
    /// 91-day CD rate, decimal.
    cd91: f64,
    calendar: Arc<dyn Calendar>,
}

impl FuturesEngine {
    /// Creates an engine.
    ///
    /// `cd91` is the 91-day CD rate as a decimal (values >= 1 are
    /// treated as percent and divided by 100).
    #[must_use]
    pub fn new(valuation_date: Date, cd91: f64, calendar: Arc<dyn Calendar>) -> Self {
        let cd91 = if cd91.abs() >= 1.0 { cd91 / 100.0 } else { cd91 };
        Self {
            valuation_date,
            cd91,
            calendar,
        }
    }

    /// The expiry used for forward pricing: the nearest quarterly
    /// third-Tuesday expiry.
    ///
    /// # Errors
    ///
    /// Propagates date-construction errors.
    pub fn expiry(&self) -> BondResult<Date> {
        let (current, _) = futures_termination_dates(self.valuation_date, &*self.calendar)?;
        Ok(current)
    }

    /// Forward yield (decimal) of one underlying at the futures expiry.
    ///
    /// 1. Price the bond today at its market yield (street convention).
    /// 2. Strip coupons paid on or before expiry, each discounted at the
    ///    CD rate over its own day count.
    /// 3. Roll the stripped price to expiry at the CD rate.
    /// 4. Invert the street price at expiry to a yield, via the solver
    ///    cascade (seeded Newton, fixed bracket, expanding bracket,
    ///    fallback seeds).
    ///
    /// # Errors
    ///
    /// Returns [`BondError::ForwardYieldFailed`] when the whole cascade
    /// fails, or propagates spec/date errors.
    pub fn forward_yield(&self, underlying: &UnderlyingBond) -> BondResult<f64> {
        let bond = Ktb::new(
            underlying.issue,
            underlying.maturity,
            underlying.coupon_percent,
        )?;
        let today = self.valuation_date;
        let market_yield = underlying.market_yield_percent / 100.0;

        let market_price = bond.dirty_price(market_yield, today)?;
        let expiry = self.expiry()?;

        // Coupons paid in (today, expiry] earn CD carry from their own
        // payment date, so discount each back at the CD rate
        let flows = bond.cash_flows();
        let mut interim_coupons = 0.0;
        for cf in flows.iter().filter(|cf| cf.date > today && cf.date <= expiry) {
            let days = today.days_between(&cf.date) as f64;
            interim_coupons += cf.amount / (1.0 + self.cd91 * days / CD_BASIS);
        }

        let clean = market_price - interim_coupons;
        let days_to_expiry = today.days_between(&expiry) as f64;
        let forward_dirty = clean * (1.0 + self.cd91 * days_to_expiry / CD_BASIS);

        // Street price terms at expiry: flows on or after expiry remain
        let (prev, next) = bond.adjacent_payment_dates(expiry);
        let remaining = flows.iter().filter(|cf| cf.date >= expiry).count() as u32;
        if remaining == 0 {
            return Err(BondError::ForwardYieldFailed {
                maturity: underlying.maturity.to_string(),
            });
        }

        let coupon = bond.coupon_amount();
        let face = bond.face();
        let p = bond.payments_per_year();
        let objective = |y: f64| {
            let (price, deriv) =
                street_price_and_derivative(coupon, face, p, y, prev, next, expiry, remaining);
            (price - forward_dirty, deriv)
        };

        self.solve_forward_yield(&objective, underlying)
    }

    /// The solver cascade for the forward-yield equation.
    fn solve_forward_yield<F>(&self, objective: &F, underlying: &UnderlyingBond) -> BondResult<f64>
    where
        F: Fn(f64) -> (f64, f64),
    {
        let f_only = |y: f64| objective(y).0;

        // 1. Newton from the standing seed
        let newton_config = NewtonConfig {
            tol_value: 1e-10,
            tol_step: 1e-14,
            max_iterations: 200,
            clamp: 0.01,
            bracket: None,
        };
        if let Ok(result) = newton_with_bisection(objective, 0.028, &newton_config) {
            return Ok(result.root);
        }

        // 2. The market-range bracket
        let tight = BisectionConfig::new(1e-10, 200);
        if let Ok(result) = bisect(&f_only, 0.02, 0.04, &tight) {
            return Ok(result.root);
        }

        // 3. Expand the upper bound a decade at a time
        let lo = 0.0;
        let mut hi = 0.10;
        for _ in 0..30 {
            if f_only(lo) * f_only(hi) <= 0.0 {
                break;
            }
            hi += 0.10;
        }
        if let Ok(result) = bisect(&f_only, lo, hi, &tight) {
            return Ok(result.root);
        }

        // 4. Fallback seeds
        for seed in FALLBACK_SEEDS {
            if let Ok(result) = newton_with_bisection(objective, seed, &newton_config) {
                return Ok(result.root);
            }
        }

        Err(BondError::ForwardYieldFailed {
            maturity: underlying.maturity.to_string(),
        })
    }

    /// Fair value of the futures contract for a basket and tenor.
    ///
    /// Averages the basket's forward yields and prices the notional
    /// 100-par bond paying 2.5 per semiannual period over `2 * tenor`
    /// periods:
    ///
    /// ```text
    /// FV = sum 2.5 / (1 + y/2)^i + 100 / (1 + y/2)^(2T)
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error for an empty basket, a zero tenor, or when any
    /// underlying's forward yield fails to solve.
    pub fn fair_value(&self, basket: &FuturesBasket, tenor_years: u32) -> BondResult<f64> {
        if basket.underlyings.is_empty() {
            return Err(BondError::invalid_spec("futures basket is empty"));
        }
        if tenor_years == 0 {
            return Err(BondError::invalid_spec("futures tenor must be positive"));
        }

        let mut sum = 0.0;
        for underlying in &basket.underlyings {
            sum += self.forward_yield(underlying)?;
        }
        let avg_yield = sum / basket.underlyings.len() as f64;

        Ok(notional_bond_price(avg_yield, tenor_years))
    }
}

/// Price of the synthetic notional bond (5% coupon, semiannual, par 100)
/// at an annual yield.
#[must_use]
pub fn notional_bond_price(avg_yield: f64, tenor_years: u32) -> f64 {
    let periods = 2 * tenor_years;
    let base = 1.0 + avg_yield / 2.0;
    let coupons: f64 = (1..=periods).map(|i| 2.5 / base.powi(i as i32)).sum();
    coupons + 100.0 / base.powi(periods as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ficc_core::calendars::WeekendCalendar;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn engine() -> FuturesEngine {
        // Valuation date of the KRX reference scenario
        FuturesEngine::new(d("2025-10-29"), 2.60, Arc::new(WeekendCalendar))
    }

    fn ten_year_underlying() -> UnderlyingBond {
        // Mar/Sep coupons: nothing pays between valuation and expiry
        UnderlyingBond::new(d("2025-03-10"), d("2035-03-10"), 2.875, 3.05)
    }

    #[test]
    fn test_expiry_is_next_quarter_third_tuesday() {
        let engine = engine();
        assert_eq!(engine.expiry().unwrap(), d("2025-12-16"));
    }

    #[test]
    fn test_cd_rate_percent_normalization() {
        let a = FuturesEngine::new(d("2025-10-29"), 2.60, Arc::new(WeekendCalendar));
        let b = FuturesEngine::new(d("2025-10-29"), 0.026, Arc::new(WeekendCalendar));
        let u = ten_year_underlying();
        assert_abs_diff_eq!(
            a.forward_yield(&u).unwrap(),
            b.forward_yield(&u).unwrap(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_forward_yield_inverts_forward_price() {
        // The defining identity of the solve: the street price at expiry
        // under the solved yield equals the carried forward price
        let engine = engine();
        let underlying = ten_year_underlying();
        let y_fwd = engine.forward_yield(&underlying).unwrap();

        let bond = Ktb::new(underlying.issue, underlying.maturity, underlying.coupon_percent)
            .unwrap();
        let today = d("2025-10-29");
        let expiry = engine.expiry().unwrap();

        let market_price = bond.dirty_price(0.0305, today).unwrap();
        // No coupon falls in (today, expiry] for this bond
        let forward_dirty =
            market_price * (1.0 + 0.026 * today.days_between(&expiry) as f64 / 365.0);

        let (prev, next) = bond.adjacent_payment_dates(expiry);
        let remaining = bond
            .cash_flows()
            .iter()
            .filter(|cf| cf.date >= expiry)
            .count() as u32;
        let (price_at_expiry, _) = street_price_and_derivative(
            bond.coupon_amount(),
            bond.face(),
            2,
            y_fwd,
            prev,
            next,
            expiry,
            remaining,
        );
        assert_relative_eq!(price_at_expiry, forward_dirty, epsilon = 1e-6);
    }

    #[test]
    fn test_forward_yield_near_market_yield() {
        // Six weeks of carry cannot move the yield far
        let engine = engine();
        let y_fwd = engine.forward_yield(&ten_year_underlying()).unwrap();
        assert!((y_fwd - 0.0305).abs() < 0.005, "forward yield = {y_fwd}");
    }

    #[test]
    fn test_interim_coupon_is_stripped() {
        // A bond paying a coupon before expiry must price below the same
        // bond without one, after carry
        let engine = engine();
        let with_coupon = UnderlyingBond::new(d("2020-12-10"), d("2030-12-10"), 3.0, 3.0);
        // Coupon on 2025-12-10, inside (2025-10-29, 2025-12-16]
        let y = engine.forward_yield(&with_coupon).unwrap();
        assert!((y - 0.03).abs() < 0.01, "forward yield = {y}");
    }

    #[test]
    fn test_notional_bond_price_at_five_percent_is_par() {
        // The synthetic bond pays 5% annually; at y = 5% it is par
        assert_relative_eq!(notional_bond_price(0.05, 3), 100.0, epsilon = 1e-10);
        assert_relative_eq!(notional_bond_price(0.05, 10), 100.0, epsilon = 1e-10);
        assert_relative_eq!(notional_bond_price(0.05, 30), 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_fair_value_averages_basket() {
        let engine = engine();
        let basket = FuturesBasket::new(vec![
            UnderlyingBond::new(d("2025-06-10"), d("2035-06-10"), 2.875, 3.00),
            UnderlyingBond::new(d("2024-12-10"), d("2034-12-10"), 3.125, 3.08),
            UnderlyingBond::new(d("2024-06-10"), d("2034-06-10"), 3.250, 3.12),
        ]);

        let fv = engine.fair_value(&basket, 10).unwrap();
        // Forward yields sit near 3.1%; the 5% notional bond trades well
        // above par there
        assert!(fv > 110.0 && fv < 125.0, "fair value = {fv}");

        let mut avg = 0.0;
        for u in &basket.underlyings {
            avg += engine.forward_yield(u).unwrap();
        }
        avg /= 3.0;
        assert_relative_eq!(fv, notional_bond_price(avg, 10), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_basket_rejected() {
        let engine = engine();
        assert!(engine.fair_value(&FuturesBasket::default(), 10).is_err());
        let basket = FuturesBasket::new(vec![ten_year_underlying()]);
        assert!(engine.fair_value(&basket, 0).is_err());
    }
}
