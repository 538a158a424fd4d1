//! KTB pricing: street-convention price, YTM inversion, curve pricing.

use ficc_core::daycounts::{Act365Fixed, DayCount};
use ficc_core::types::Date;
use ficc_curves::bootstrap::DiscountFactorNode;
use ficc_math::solvers::{newton_with_bisection, NewtonConfig};

use crate::bond::Ktb;
use crate::error::{BondError, BondResult};

/// Street-convention price at `pricing_date` with `n` payments remaining.
///
/// Discounts the remaining coupon strip and principal to the next
/// payment date at `(1 + y/p)` per period, then rolls back over the
/// broken period by the simple stub fraction:
///
/// ```text
/// P = A / (1 + frac * y/p),   frac = days(pricing -> next) / days(prev -> next)
/// ```
///
/// Returns `(price, d price / d y)`. `n` counts the payments on or
/// after `next`; the principal is attached to the last of them.
pub(crate) fn street_price_and_derivative(
    coupon: f64,
    face: f64,
    payments_per_year: u32,
    y: f64,
    prev: Date,
    next: Date,
    pricing_date: Date,
    n: u32,
) -> (f64, f64) {
    let p = f64::from(payments_per_year);
    let mut base = 1.0 + y / p;
    if base <= 0.0 {
        base = 1e-8;
    }

    let mut a = 0.0;
    let mut a_prime = 0.0;
    for i in 0..n {
        let i_f = f64::from(i);
        a += coupon * base.powf(-i_f);
        a_prime += -coupon * i_f / p * base.powf(-i_f - 1.0);
    }
    let last = f64::from(n.saturating_sub(1));
    a += face * base.powf(-last);
    a_prime += -face * last / p * base.powf(-last - 1.0);

    let days_to_next = pricing_date.days_between(&next) as f64;
    let days_in_period = (prev.days_between(&next) as f64).max(1.0);
    let frac = days_to_next / days_in_period;

    let denom = 1.0 + frac * y / p;
    let price = a / denom;
    let deriv = a_prime / denom - a * (frac / p) / (denom * denom);

    (price, deriv)
}

impl Ktb {
    /// Clamps a settlement date into the bond's life.
    fn resolve_settlement(&self, settlement: Date) -> Date {
        settlement.max(self.issue()).min(self.maturity())
    }

    /// Dirty price for a yield-to-maturity given as a decimal.
    ///
    /// Uses the semiannual street convention of §street pricing: the
    /// remaining payments discount to the next coupon date, and the
    /// broken period discounts by the simple stub fraction. Returns 0
    /// when no cash flows remain (documented boundary).
    ///
    /// # Errors
    ///
    /// Returns an error for `ytm <= -1`.
    pub fn dirty_price(&self, ytm: f64, settlement: Date) -> BondResult<f64> {
        if ytm <= -1.0 {
            return Err(BondError::InvalidYield {
                value: ytm,
                reason: "yield must exceed -100%".into(),
            });
        }
        let settlement = self.resolve_settlement(settlement);
        if settlement >= self.maturity() {
            return Ok(0.0);
        }

        let flows = self.cash_flows();
        let remaining = flows.iter().filter(|cf| cf.date > settlement).count() as u32;
        if remaining == 0 {
            return Ok(0.0);
        }
        let (prev, next) = self.adjacent_payment_dates(settlement);

        let (price, _) = street_price_and_derivative(
            self.coupon_amount(),
            self.face(),
            self.payments_per_year(),
            ytm,
            prev,
            next,
            settlement,
            remaining,
        );
        Ok(price)
    }

    /// Accrued interest at settlement under ACT/365F.
    ///
    /// The per-period coupon accrues by elapsed/accrual within the
    /// active coupon period.
    #[must_use]
    pub fn accrued_interest(&self, settlement: Date) -> f64 {
        let settlement = self.resolve_settlement(settlement);
        let (prev, next) = self.adjacent_payment_dates(settlement);
        if prev == next {
            return 0.0;
        }
        let accrual = Act365Fixed.year_fraction(prev, next);
        if accrual == 0.0 {
            return 0.0;
        }
        let elapsed = Act365Fixed.year_fraction(prev, settlement);
        self.coupon_amount() * elapsed / accrual
    }

    /// Clean price: dirty less accrued.
    ///
    /// # Errors
    ///
    /// Returns an error for `ytm <= -1`.
    pub fn clean_price(&self, ytm: f64, settlement: Date) -> BondResult<f64> {
        Ok(self.dirty_price(ytm, settlement)? - self.accrued_interest(settlement))
    }

    /// Solves the yield-to-maturity (decimal) from a dirty price.
    ///
    /// Newton-Raphson with an analytic derivative, seeded at
    /// `max(coupon, 2%)` unless a guess is supplied, step-clamped to
    /// 100bp inside the bracket (-2%, 30%), with a bisection fallback.
    /// Returns 0 when no cash flows remain.
    ///
    /// # Errors
    ///
    /// Returns an error when both Newton and the fallback fail to
    /// converge.
    pub fn ytm_from_dirty_price(
        &self,
        dirty_price: f64,
        settlement: Date,
        guess: Option<f64>,
    ) -> BondResult<f64> {
        let settlement = self.resolve_settlement(settlement);
        let flows = self.cash_flows();
        let remaining = flows.iter().filter(|cf| cf.date > settlement).count() as u32;
        if remaining == 0 || settlement >= self.maturity() {
            return Ok(0.0);
        }
        let (prev, next) = self.adjacent_payment_dates(settlement);

        let coupon = self.coupon_amount();
        let face = self.face();
        let p = self.payments_per_year();
        let objective = |y: f64| {
            let (price, deriv) =
                street_price_and_derivative(coupon, face, p, y, prev, next, settlement, remaining);
            (price - dirty_price, deriv)
        };

        let config = NewtonConfig {
            tol_value: 1e-6,
            tol_step: 1e-10,
            max_iterations: 50,
            clamp: 0.01,
            bracket: Some((-0.02, 0.30)),
        };
        let initial = guess.unwrap_or_else(|| self.coupon_rate().max(0.02));

        let result = newton_with_bisection(&objective, initial, &config)
            .map_err(|e| BondError::numerical(format!("ytm of bond {}", self.maturity()), e))?;
        log::debug!(
            "ytm solved in {} iterations via {:?}",
            result.iterations,
            result.method
        );
        Ok(result.root)
    }

    /// Prices the bond off dated discount-factor nodes.
    ///
    /// Each future cash flow discounts at the node curve, interpolating
    /// log-linearly in the discount factor over ACT/365F times with flat
    /// ends.
    #[must_use]
    pub fn price_from_discount_nodes(
        &self,
        settlement: Date,
        nodes: &[DiscountFactorNode],
    ) -> f64 {
        if nodes.is_empty() {
            return 0.0;
        }
        self.cash_flows()
            .iter()
            .filter(|cf| cf.date > settlement)
            .map(|cf| {
                let t = Act365Fixed.year_fraction(settlement, cf.date);
                cf.amount * interpolate_node_df(nodes, t)
            })
            .sum()
    }

    /// Forward dirty price for delivery at `forward_date`.
    ///
    /// Spot price less the discounted value of cash flows paid in
    /// `(settlement, forward_date]`, rolled up at the forward-date
    /// discount factor.
    #[must_use]
    pub fn forward_price(
        &self,
        settlement: Date,
        forward_date: Date,
        nodes: &[DiscountFactorNode],
    ) -> f64 {
        let spot = self.price_from_discount_nodes(settlement, nodes);
        let interim: f64 = self
            .cash_flows()
            .iter()
            .filter(|cf| cf.date > settlement && cf.date <= forward_date)
            .map(|cf| {
                let t = Act365Fixed.year_fraction(settlement, cf.date);
                cf.amount * interpolate_node_df(nodes, t)
            })
            .sum();

        let t_fwd = Act365Fixed.year_fraction(settlement, forward_date);
        (spot - interim) / interpolate_node_df(nodes, t_fwd)
    }
}

/// Log-linear discount factor interpolation over dated nodes, flat
/// outside the node range.
pub(crate) fn interpolate_node_df(nodes: &[DiscountFactorNode], t: f64) -> f64 {
    let first = &nodes[0];
    if t <= first.years_from_valuation {
        return first.discount_factor;
    }
    let last = &nodes[nodes.len() - 1];
    if t >= last.years_from_valuation {
        return last.discount_factor;
    }
    let idx = nodes.partition_point(|n| n.years_from_valuation < t);
    let (t0, ln0) = (
        nodes[idx - 1].years_from_valuation,
        nodes[idx - 1].discount_factor.ln(),
    );
    let (t1, ln1) = (
        nodes[idx].years_from_valuation,
        nodes[idx].discount_factor.ln(),
    );
    let w = (t - t0) / (t1 - t0);
    (ln0 + w * (ln1 - ln0)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn sample_bond() -> Ktb {
        Ktb::new(d("2020-03-10"), d("2030-03-10"), 2.75).unwrap()
    }

    #[test]
    fn test_price_yield_round_trip() {
        let bond = sample_bond();
        let settlement = d("2023-09-01");
        let dirty = bond.dirty_price(0.03, settlement).unwrap();
        assert!(dirty > 0.0);
        let ytm = bond.ytm_from_dirty_price(dirty, settlement, None).unwrap();
        assert_abs_diff_eq!(ytm, 0.03, epsilon = 1e-6);
    }

    #[test]
    fn test_round_trip_across_yield_range() {
        let bond = sample_bond();
        let settlement = d("2023-09-01");
        for &y in &[-0.015, 0.0, 0.005, 0.05, 0.12, 0.29] {
            let dirty = bond.dirty_price(y, settlement).unwrap();
            let back = bond.ytm_from_dirty_price(dirty, settlement, None).unwrap();
            assert_abs_diff_eq!(back, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_price_at_coupon_equals_par_when_ytm_is_coupon() {
        // On a coupon date, pricing at y = coupon gives par plus the
        // full coupon discounted back over one whole period:
        // A = par-annuity value at next date, rolled back one period.
        let bond = sample_bond();
        let settlement = d("2025-03-10");
        let dirty = bond.dirty_price(0.0275, settlement).unwrap();
        // Clean should be at par (accrued is zero on the coupon date)
        assert_eq!(bond.accrued_interest(settlement), 0.0);
        assert_relative_eq!(dirty, 10_000.0, epsilon = 1e-8);
    }

    #[test]
    fn test_price_decreases_in_yield() {
        let bond = sample_bond();
        let settlement = d("2023-09-01");
        let p1 = bond.dirty_price(0.02, settlement).unwrap();
        let p2 = bond.dirty_price(0.03, settlement).unwrap();
        let p3 = bond.dirty_price(0.04, settlement).unwrap();
        assert!(p1 > p2 && p2 > p3);
    }

    #[test]
    fn test_clean_plus_accrued_is_dirty() {
        let bond = sample_bond();
        let settlement = d("2023-09-01");
        let dirty = bond.dirty_price(0.03, settlement).unwrap();
        let clean = bond.clean_price(0.03, settlement).unwrap();
        let accrued = bond.accrued_interest(settlement);
        assert_relative_eq!(clean + accrued, dirty, epsilon = 1e-10);
        assert!(accrued > 0.0);
    }

    #[test]
    fn test_accrued_fraction() {
        let bond = sample_bond();
        // 2023-03-10 to 2023-09-10 is 184 days; 2023-06-10 is 92 days in
        let accrued = bond.accrued_interest(d("2023-06-10"));
        assert_relative_eq!(accrued, 137.5 * 92.0 / 184.0, epsilon = 1e-10);
    }

    #[test]
    fn test_no_future_cashflows_prices_zero() {
        let bond = sample_bond();
        assert_eq!(bond.dirty_price(0.03, d("2030-03-10")).unwrap(), 0.0);
        assert_eq!(bond.dirty_price(0.03, d("2031-01-01")).unwrap(), 0.0);
        assert_eq!(
            bond.ytm_from_dirty_price(9_000.0, d("2031-01-01"), None).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_invalid_yield_rejected() {
        let bond = sample_bond();
        assert!(bond.dirty_price(-1.0, d("2023-09-01")).is_err());
        assert!(bond.dirty_price(-1.5, d("2023-09-01")).is_err());
    }

    #[test]
    fn test_price_from_discount_nodes_flat_curve() {
        let bond = sample_bond();
        let settlement = d("2023-09-01");
        let rate = 0.03_f64;
        let nodes: Vec<DiscountFactorNode> = (1..=30)
            .map(|i| {
                let t = f64::from(i) * 0.25;
                DiscountFactorNode::new(
                    settlement.add_days((t * 365.0).round() as i64),
                    (-rate * t).exp(),
                    t,
                )
            })
            .collect();

        let price = bond.price_from_discount_nodes(settlement, &nodes);
        // Continuous discounting of each flow directly
        let expected: f64 = bond
            .cash_flows()
            .iter()
            .filter(|cf| cf.date > settlement)
            .map(|cf| {
                let t = Act365Fixed.year_fraction(settlement, cf.date);
                cf.amount * (-rate * t).exp()
            })
            .sum();
        assert_relative_eq!(price, expected, epsilon = 1e-10);
    }

    #[test]
    fn test_forward_price_no_interim_coupon() {
        // With no coupon before the forward date, the forward is the
        // spot compounded at the curve rate
        let bond = sample_bond();
        let settlement = d("2023-09-15");
        let forward_date = d("2023-12-15");
        let rate = 0.03_f64;
        let nodes: Vec<DiscountFactorNode> = (1..=30)
            .map(|i| {
                let t = f64::from(i) * 0.25;
                DiscountFactorNode::new(
                    settlement.add_days((t * 365.0).round() as i64),
                    (-rate * t).exp(),
                    t,
                )
            })
            .collect();

        let spot = bond.price_from_discount_nodes(settlement, &nodes);
        let fwd = bond.forward_price(settlement, forward_date, &nodes);
        let t_fwd = Act365Fixed.year_fraction(settlement, forward_date);
        assert_relative_eq!(fwd, spot / (-rate * t_fwd).exp(), epsilon = 1e-10);
        assert!(fwd > spot);
    }
}
