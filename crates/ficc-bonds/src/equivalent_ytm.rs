//! YTM-space equivalents of key-rate shifts.
//!
//! For hedging screens the curve-space key-rate deltas are re-expressed
//! as the single-yield move that produces the same price change on the
//! plain YTM pricer.

use ficc_core::types::Date;
use ficc_curves::zero::ZeroCurve;

use crate::bond::Ktb;
use crate::error::BondResult;
use crate::risk::{key_rate_delta, price_from_par_curve};

/// Equivalent YTM shifts (percent points) per key tenor for one bond.
///
/// For each tenor the bumped price `P0 + KRD` is inverted back to a
/// yield; the shift is `y1 - y0` in percent points, where `y0` inverts
/// the baseline par-curve price.
///
/// # Errors
///
/// Propagates pricing, inversion, and re-bootstrap failures.
pub fn equivalent_ytm_shifts(
    bond: &Ktb,
    curve: &ZeroCurve,
    settlement: Date,
    key_tenors: &[f64],
    bump_bp: f64,
) -> BondResult<Vec<(f64, f64)>> {
    let base_price = price_from_par_curve(bond, curve, settlement)?;
    let y0 = bond.ytm_from_dirty_price(base_price, settlement, None)?;

    let mut shifts = Vec::with_capacity(key_tenors.len());
    for &tenor in key_tenors {
        let delta = key_rate_delta(bond, curve, settlement, tenor, bump_bp)?;
        let y1 = bond.ytm_from_dirty_price(base_price + delta, settlement, Some(y0))?;
        shifts.push((tenor, (y1 - y0) * 100.0));
    }
    Ok(shifts)
}

/// Equivalent YTM levels: the observed yield plus each shift, percent.
#[must_use]
pub fn equivalent_ytm_levels(
    observed_ytm_percent: f64,
    shifts_percent: &[(f64, f64)],
) -> Vec<(f64, f64)> {
    shifts_percent
        .iter()
        .map(|&(tenor, shift)| (tenor, observed_ytm_percent + shift))
        .collect()
}

/// Shifts and levels for a batch of bonds.
///
/// `bonds` carries `(identifier, bond, observed_ytm_percent)` rows.
/// Returns `(identifier, shifts, levels)` rows in input order.
///
/// # Errors
///
/// Propagates the first per-bond failure.
#[allow(clippy::type_complexity)]
pub fn equivalent_ytm_for_bonds(
    bonds: &[(String, Ktb, f64)],
    curve: &ZeroCurve,
    settlement: Date,
    key_tenors: &[f64],
    bump_bp: f64,
) -> BondResult<Vec<(String, Vec<(f64, f64)>, Vec<(f64, f64)>)>> {
    let mut out = Vec::with_capacity(bonds.len());
    for (id, bond, observed) in bonds {
        let shifts = equivalent_ytm_shifts(bond, curve, settlement, key_tenors, bump_bp)?;
        let levels = equivalent_ytm_levels(*observed, &shifts);
        out.push((id.clone(), shifts, levels));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ficc_curves::compounding::Compounding;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn curve(curve_date: Date) -> ZeroCurve {
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
    fn test_own_tenor_shift_near_minus_one_bp() {
        // For a par bond bumped at its own tenor, the equivalent YTM
        // shift is close to the quote bump itself (-1bp = -0.01pp)
        let curve_date = d("2025-06-30");
        let curve = curve(curve_date);
        let bond = Ktb::new(curve_date, d("2030-06-30"), 3.5).unwrap();

        let shifts =
            equivalent_ytm_shifts(&bond, &curve, curve_date, &[5.0], 1.0).unwrap();
        let (tenor, shift) = shifts[0];
        assert_eq!(tenor, 5.0);
        assert_relative_eq!(shift, -0.01, max_relative = 0.05);
    }

    #[test]
    fn test_remote_tenor_shift_is_small() {
        let curve_date = d("2025-06-30");
        let curve = curve(curve_date);
        let bond = Ktb::new(curve_date, d("2030-06-30"), 3.5).unwrap();

        let shifts =
            equivalent_ytm_shifts(&bond, &curve, curve_date, &[0.25, 5.0], 1.0).unwrap();
        assert!(shifts[0].1.abs() < shifts[1].1.abs() * 0.05);
    }

    #[test]
    fn test_levels_add_observed() {
        let shifts = vec![(2.0, -0.004), (5.0, -0.0098)];
        let levels = equivalent_ytm_levels(3.52, &shifts);
        assert_relative_eq!(levels[0].1, 3.516);
        assert_relative_eq!(levels[1].1, 3.5102);
    }

    #[test]
    fn test_batch_shape() {
        let curve_date = d("2025-06-30");
        let curve = curve(curve_date);
        let bond = Ktb::new(curve_date, d("2028-06-30"), 3.4).unwrap();
        let rows = equivalent_ytm_for_bonds(
            &[("KR001".into(), bond, 3.41)],
            &curve,
            curve_date,
            &[1.0, 3.0],
            1.0,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].1.len(), 2);
        assert_eq!(rows[0].2.len(), 2);
        // Level = observed + shift
        assert_relative_eq!(rows[0].2[1].1, 3.41 + rows[0].1[1].1);
    }
}
