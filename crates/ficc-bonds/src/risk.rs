//! Duration, convexity, and key-rate deltas.

use ficc_core::daycounts::{Act365Fixed, DayCount};
use ficc_core::types::Date;
use ficc_curves::zero::ZeroCurve;

use crate::bond::Ktb;
use crate::error::{BondError, BondResult};

impl Ktb {
    /// Modified duration at a decimal yield.
    ///
    /// Weights each future cash flow by its stub-adjusted present value
    /// over the dirty price; times are ACT/365F years from settlement.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid yield or a zero dirty price.
    pub fn modified_duration(
        &self,
        ytm: f64,
        settlement: Date,
        dirty_price: Option<f64>,
    ) -> BondResult<f64> {
        let (weighted_time, _, base) = self.pv_weighted_moments(ytm, settlement, dirty_price)?;
        Ok(weighted_time / base)
    }

    /// Convexity at a decimal yield.
    ///
    /// `sum w_i * t_i * (t_i + 1/p) / (1 + y/p)^2` with the same
    /// stub-adjusted weights as the duration.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid yield or a zero dirty price.
    pub fn convexity(
        &self,
        ytm: f64,
        settlement: Date,
        dirty_price: Option<f64>,
    ) -> BondResult<f64> {
        let (_, weighted_convexity, base) =
            self.pv_weighted_moments(ytm, settlement, dirty_price)?;
        Ok(weighted_convexity / (base * base))
    }

    /// Shared accumulation for duration and convexity:
    /// `(sum w t, sum w t (t + 1/p), 1 + y/p)`.
    fn pv_weighted_moments(
        &self,
        ytm: f64,
        settlement: Date,
        dirty_price: Option<f64>,
    ) -> BondResult<(f64, f64, f64)> {
        if ytm <= -1.0 {
            return Err(BondError::InvalidYield {
                value: ytm,
                reason: "yield must exceed -100%".into(),
            });
        }
        let dirty = match dirty_price {
            Some(p) => p,
            None => self.dirty_price(ytm, settlement)?,
        };
        if dirty == 0.0 {
            return Err(BondError::invalid_spec(
                "duration is undefined with no future cashflows",
            ));
        }

        let p = f64::from(self.payments_per_year());
        let base = 1.0 + ytm / p;
        let (prev, next) = self.adjacent_payment_dates(settlement);
        let days_in_period = (prev.days_between(&next) as f64).max(1.0);
        let frac = settlement.days_between(&next) as f64 / days_in_period;
        let stub = 1.0 + (ytm / p) * frac;

        let mut weighted_time = 0.0;
        let mut weighted_convexity = 0.0;
        let mut power = 0;

        for cf in self.cash_flows().iter().filter(|cf| cf.date > settlement) {
            let pv = cf.amount / base.powi(power) / stub;
            let weight = pv / dirty;
            let t = Act365Fixed.year_fraction(settlement, cf.date);
            weighted_time += weight * t;
            weighted_convexity += weight * t * (t + 1.0 / p);
            power += 1;
        }

        Ok((weighted_time, weighted_convexity, base))
    }
}

/// Builds the half-year discount grid of a (re-)bootstrapped curve:
/// 0.25, every half year, and 0.75, up to the last curve node.
fn half_year_df_grid(curve: &ZeroCurve) -> Vec<(f64, f64)> {
    let max_t = curve
        .nodes()
        .last()
        .map(|&(t, _)| t)
        .unwrap_or(0.0);

    let mut tenors = Vec::new();
    if max_t >= 0.25 {
        tenors.push(0.25);
    }
    if max_t >= 0.75 {
        tenors.push(0.75);
    }
    let mut k = 1;
    while 0.5 * f64::from(k) <= max_t + 1e-12 {
        tenors.push(0.5 * f64::from(k));
        k += 1;
    }
    tenors.sort_by(|a, b| a.partial_cmp(b).expect("tenor is not NaN"));
    tenors.dedup();

    tenors.into_iter().map(|t| (t, curve.df(t))).collect()
}

/// Discount factor from a half-year grid: log-linear in DF between grid
/// points on the ACT/365F time axis, continuous-zero extension outside.
fn grid_df(grid: &[(f64, f64)], t: f64) -> f64 {
    let (t_first, df_first) = grid[0];
    if t <= t_first {
        let z = -df_first.ln() / t_first;
        return (-z * t).exp();
    }
    let (t_last, df_last) = grid[grid.len() - 1];
    if t >= t_last {
        let z = -df_last.ln() / t_last;
        return (-z * t).exp();
    }
    let idx = grid.partition_point(|&(p, _)| p < t);
    let (t0, df0) = grid[idx - 1];
    let (t1, df1) = grid[idx];
    let w = (t - t0) / (t1 - t0);
    (df0.ln() + w * (df1.ln() - df0.ln())).exp()
}

/// Prices a bond's future cash flows on a curve's half-year DF grid.
fn price_on_grid(bond: &Ktb, settlement: Date, grid: &[(f64, f64)]) -> f64 {
    bond.cash_flows()
        .iter()
        .filter(|cf| cf.date > settlement)
        .map(|cf| {
            let t = Act365Fixed.year_fraction(settlement, cf.date);
            cf.amount * grid_df(grid, t)
        })
        .sum()
}

/// Prices a bond off a par curve via its half-year discount grid.
///
/// This is the key-rate baseline price: the same discounting the
/// key-rate bump uses, so deltas are internally consistent.
///
/// # Errors
///
/// Returns an error for an empty curve.
pub fn price_from_par_curve(
    bond: &Ktb,
    curve: &ZeroCurve,
    settlement: Date,
) -> BondResult<f64> {
    let grid = half_year_df_grid(curve);
    if grid.is_empty() {
        return Err(BondError::Curve(ficc_curves::CurveError::EmptyCurve));
    }
    Ok(price_on_grid(bond, settlement, &grid))
}

/// Key-rate delta: the price change for a `-bump_bp` shift of one par
/// node, via re-bootstrap.
///
/// The par node at `key_tenor` is shifted down by `bump_bp` basis
/// points (interpolated in when not quoted), the curve re-bootstraps,
/// and the bond reprices on the bumped half-year discount grid. The
/// result is the price change in price units (positive for a long
/// position under a downward bump).
///
/// # Errors
///
/// Propagates re-bootstrap failures.
pub fn key_rate_delta(
    bond: &Ktb,
    curve: &ZeroCurve,
    settlement: Date,
    key_tenor: f64,
    bump_bp: f64,
) -> BondResult<f64> {
    let base_grid = half_year_df_grid(curve);
    let base_price = price_on_grid(bond, settlement, &base_grid);

    let bumped_curve = curve.with_shifted_node(key_tenor, -bump_bp)?;
    let bumped_grid = half_year_df_grid(&bumped_curve);
    let bumped_price = price_on_grid(bond, settlement, &bumped_grid);

    let delta = bumped_price - base_price;
    log::debug!(
        "krd tenor={key_tenor}Y base={base_price} bumped={bumped_price} delta={delta}"
    );
    Ok(delta)
}

/// Key-rate deltas for a batch of bonds across a key-tenor set.
///
/// Returns one `(id, deltas)` row per bond, with deltas ordered as the
/// key tenors.
///
/// # Errors
///
/// Propagates the first re-bootstrap failure.
pub fn batch_key_rate_delta(
    bonds: &[(String, Ktb)],
    curve: &ZeroCurve,
    settlement: Date,
    key_tenors: &[f64],
    bump_bp: f64,
) -> BondResult<Vec<(String, Vec<(f64, f64)>)>> {
    // Bump each tenor once and reuse the grids across the whole batch
    let base_grid = half_year_df_grid(curve);
    let mut bumped_grids = Vec::with_capacity(key_tenors.len());
    for &tenor in key_tenors {
        let bumped = curve.with_shifted_node(tenor, -bump_bp)?;
        bumped_grids.push((tenor, half_year_df_grid(&bumped)));
    }

    let mut results = Vec::with_capacity(bonds.len());
    for (id, bond) in bonds {
        let base_price = price_on_grid(bond, settlement, &base_grid);
        let deltas = bumped_grids
            .iter()
            .map(|(tenor, grid)| (*tenor, price_on_grid(bond, settlement, grid) - base_price))
            .collect();
        results.push((id.clone(), deltas));
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ficc_curves::compounding::Compounding;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn s3_curve(curve_date: Date) -> ZeroCurve {
        ZeroCurve::from_par_yields(
            curve_date,
            &[
                (0.25, 3.00),
                (0.5, 3.10),
                (1.0, 3.20),
                (2.0, 3.30),
                (3.0, 3.40),
                (5.0, 3.50),
            ],
            Compounding::Continuous,
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_duration_of_par_bond() {
        let bond = Ktb::new(d("2020-03-10"), d("2030-03-10"), 3.0).unwrap();
        let settlement = d("2020-03-10");
        // Fresh 10Y par bond at 3%: modified duration just above 8.5
        let duration = bond.modified_duration(0.03, settlement, None).unwrap();
        assert!(duration > 8.0 && duration < 9.0, "duration = {duration}");
    }

    #[test]
    fn test_duration_decreases_with_yield() {
        let bond = Ktb::new(d("2020-03-10"), d("2030-03-10"), 3.0).unwrap();
        let settlement = d("2023-09-01");
        let d_low = bond.modified_duration(0.01, settlement, None).unwrap();
        let d_high = bond.modified_duration(0.08, settlement, None).unwrap();
        assert!(d_low > d_high);
    }

    #[test]
    fn test_convexity_positive_and_scaled() {
        let bond = Ktb::new(d("2020-03-10"), d("2030-03-10"), 3.0).unwrap();
        let settlement = d("2023-09-01");
        let duration = bond.modified_duration(0.03, settlement, None).unwrap();
        let convexity = bond.convexity(0.03, settlement, None).unwrap();
        assert!(convexity > 0.0);
        // For a coupon bond convexity exceeds duration squared over these maturities
        assert!(convexity > duration);
    }

    #[test]
    fn test_duration_predicts_small_price_move() {
        let bond = Ktb::new(d("2020-03-10"), d("2030-03-10"), 3.0).unwrap();
        let settlement = d("2023-09-01");
        let y = 0.03;
        let dy = 1e-4;
        let p0 = bond.dirty_price(y, settlement).unwrap();
        let p1 = bond.dirty_price(y + dy, settlement).unwrap();
        let duration = bond.modified_duration(y, settlement, Some(p0)).unwrap();
        // First-order only: convexity and the day-count drift between
        // calendar times and whole periods bound the residual
        let predicted = -p0 * duration * dy;
        assert_relative_eq!(p1 - p0, predicted, max_relative = 5e-3);
    }

    #[test]
    fn test_krd_sign_and_locality() {
        let curve_date = d("2025-06-30");
        let curve = s3_curve(curve_date);
        let bond = Ktb::new(curve_date, d("2030-06-30"), 3.5).unwrap();

        // A downward bump at the bond's maturity tenor raises the price
        let delta_5y = key_rate_delta(&bond, &curve, curve_date, 5.0, 1.0).unwrap();
        assert!(delta_5y > 0.0);

        // A bump at a tenor past all of the bond's cashflow weight
        // barely moves it relative to the own-tenor bump
        let delta_025 = key_rate_delta(&bond, &curve, curve_date, 0.25, 1.0).unwrap();
        assert!(delta_025.abs() < delta_5y * 0.05);
    }

    #[test]
    fn test_krd_reconciles_with_duration() {
        // A 5Y par bond: KRD at its own tenor matches
        // modified duration times a 1bp quote change within 1%
        let curve_date = d("2025-06-30");
        let curve = s3_curve(curve_date);
        let bond = Ktb::new(curve_date, d("2030-06-30"), 3.5).unwrap();

        let p0 = price_from_par_curve(&bond, &curve, curve_date).unwrap();
        let y0 = bond.ytm_from_dirty_price(p0, curve_date, None).unwrap();
        let duration = bond.modified_duration(y0, curve_date, Some(p0)).unwrap();

        let delta = key_rate_delta(&bond, &curve, curve_date, 5.0, 1.0).unwrap();
        let predicted = p0 * duration * 1e-4;
        assert_relative_eq!(delta, predicted, max_relative = 0.01);
    }

    #[test]
    fn test_batch_matches_single() {
        let curve_date = d("2025-06-30");
        let curve = s3_curve(curve_date);
        let bond = Ktb::new(curve_date, d("2028-06-30"), 3.4).unwrap();

        let single = key_rate_delta(&bond, &curve, curve_date, 3.0, 1.0).unwrap();
        let batch = batch_key_rate_delta(
            &[("KR001".into(), bond)],
            &curve,
            curve_date,
            &[2.0, 3.0],
            1.0,
        )
        .unwrap();
        assert_eq!(batch.len(), 1);
        let (id, deltas) = &batch[0];
        assert_eq!(id, "KR001");
        assert_abs_diff_eq!(deltas[1].1, single, epsilon = 1e-12);
    }
}
