//! Zero rates from par yields.
//!
//! Sequential bootstrap of simple-annual zero rates from KTB par-yield
//! quotes. The short end is anchored analytically; every later pillar
//! solves a one-dimensional par condition in the pillar discount factor,
//! with coupons between the last known pillar and the new maturity
//! parameterized log-linearly in the unknown.

use ficc_math::solvers::{bisect, BisectionConfig};

use crate::error::{CurveError, CurveResult};

const TINY: f64 = 1e-9;

/// Bootstraps continuous zero rates (decimal) from par-yield nodes.
///
/// Input nodes are `(tenor_years, par_yield)` with rates in decimal or
/// percent (values with magnitude >= 1 are divided by 100). Only
/// half-year multiples are bootstrapped, with 0.75 admitted when quoted;
/// other tenors are skipped. Anchors:
///
/// - `z(0.25) = y(0.25)` (discount quote)
/// - `z(0.5) = (1 + y/2)^2 - 1` (single final cashflow)
///
/// For each later tenor `T` the pillar discount factor solves
///
/// ```text
/// const_pv + final_payment * df_T + sum K_j * df_T^{w_j} = 1
/// ```
///
/// by bisection on `(1e-12, 1)` with 80 iterations at tolerance 1e-12;
/// when both endpoints have the same sign the endpoint with the smaller
/// residual is taken.
///
/// # Errors
///
/// Returns an error when the node set is empty, the frequency is zero,
/// or a pillar is quoted without any shorter anchor to build on.
pub fn bootstrap_zero_from_par(
    par_nodes: &[(f64, f64)],
    frequency: u32,
) -> CurveResult<Vec<(f64, f64)>> {
    if frequency == 0 {
        return Err(CurveError::invalid_data("frequency must be positive"));
    }
    if par_nodes.is_empty() {
        return Err(CurveError::EmptyCurve);
    }

    let freq = f64::from(frequency);
    let ytm: Vec<(f64, f64)> = par_nodes
        .iter()
        .map(|&(t, r)| (t, if r.abs() >= 1.0 { r / 100.0 } else { r }))
        .collect();

    let mut zero_simple: Vec<(f64, f64)> = Vec::new();

    if let Some(&(_, y)) = ytm.iter().find(|&&(t, _)| (t - 0.25).abs() < TINY) {
        zero_simple.push((0.25, y));
    }
    if let Some(&(_, c)) = ytm.iter().find(|&&(t, _)| (t - 0.5).abs() < TINY) {
        zero_simple.push((0.5, (1.0 + c / 2.0).powi(2) - 1.0));
    }
    zero_simple.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("tenor is not NaN"));

    for &(tenor, coupon_rate) in &ytm {
        if tenor <= 0.5 + TINY {
            continue;
        }
        if !on_half_year_grid(tenor) {
            log::debug!("skipping off-grid par tenor {tenor}");
            continue;
        }

        let (const_pv, coeffs, final_payment) =
            par_condition_terms(&zero_simple, tenor, coupon_rate, freq)?;

        let residual = |df_t: f64| {
            let mut s = const_pv + final_payment * df_t;
            for &(k, w) in &coeffs {
                s += k * df_t.powf(w);
            }
            s - 1.0
        };

        let df_t = solve_pillar_df(&residual, tenor)?;
        let z_t = df_t.powf(-1.0 / tenor) - 1.0;
        zero_simple.push((tenor, z_t));
        zero_simple.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("tenor is not NaN"));
        log::debug!("par bootstrap pillar {tenor}: df={df_t} z_simple={z_t}");
    }

    if zero_simple.is_empty() {
        return Err(CurveError::invalid_data(
            "no bootstrappable tenors in the par node set",
        ));
    }

    // Simple-annual to continuous: z_cont = ln(1 + z_simple)
    Ok(zero_simple
        .into_iter()
        .map(|(t, z)| (t, (1.0 + z).ln()))
        .collect())
}

/// Reprices one par quote off a bootstrapped curve, discounting exactly
/// the way the bootstrap did.
///
/// `zeros_cont` is the output of [`bootstrap_zero_from_par`]; `tenor`
/// must be at least 0.5 (the 0.25 anchor is a discount quote, not a
/// coupon instrument, and reprices by construction). Returns the present
/// value of the unit-par instrument; a correct bootstrap reprices to 1.
///
/// # Errors
///
/// Returns an error when the pillar set has no anchor below `tenor`.
pub fn reprice_par_quote(
    zeros_cont: &[(f64, f64)],
    par_rate: f64,
    tenor: f64,
    frequency: u32,
) -> CurveResult<f64> {
    if frequency == 0 {
        return Err(CurveError::invalid_data("frequency must be positive"));
    }
    let freq = f64::from(frequency);
    let coupon_rate = if par_rate.abs() >= 1.0 {
        par_rate / 100.0
    } else {
        par_rate
    };

    let zero_simple: Vec<(f64, f64)> = zeros_cont
        .iter()
        .map(|&(t, z)| (t, z.exp() - 1.0))
        .collect();

    if tenor <= 0.5 + TINY {
        // Single final cashflow at the pillar discount factor
        let df = pillar_df(&zero_simple, tenor);
        let final_payment = coupon_rate / freq * (tenor * freq) + 1.0;
        return Ok(final_payment * df);
    }

    let (const_pv, coeffs, final_payment) =
        par_condition_terms(&zero_simple, tenor, coupon_rate, freq)?;
    let df_t = pillar_df(&zero_simple, tenor);

    let mut pv = const_pv + final_payment * df_t;
    for &(k, w) in &coeffs {
        pv += k * df_t.powf(w);
    }
    Ok(pv)
}

/// Builds the par-condition decomposition for tenor `T`:
/// the constant PV of coupons inside the known region, the
/// `K * df_T^w` coefficients for coupons past the last anchor, and the
/// final payment (coupon stub plus principal).
fn par_condition_terms(
    zero_simple: &[(f64, f64)],
    tenor: f64,
    coupon_rate: f64,
    freq: f64,
) -> CurveResult<(f64, Vec<(f64, f64)>, f64)> {
    let coupon_payment = coupon_rate / freq;

    let t_lo = zero_simple
        .iter()
        .map(|&(t, _)| t)
        .filter(|&t| t < tenor)
        .fold(f64::NAN, f64::max);
    if t_lo.is_nan() {
        return Err(CurveError::invalid_data(format!(
            "par bootstrap requires short-end anchors below tenor {tenor}"
        )));
    }
    let df_lo = pillar_df(zero_simple, t_lo);

    let mut const_pv = 0.0;
    let mut coeffs: Vec<(f64, f64)> = Vec::new();

    let periods = ((tenor - TINY) * freq) as i64;
    for period in 1..=periods {
        let t = period as f64 / freq;
        if t >= tenor - TINY {
            break;
        }
        if t <= t_lo + TINY {
            let df_t = pillar_df(zero_simple, t);
            const_pv += coupon_payment * df_t;
        } else {
            let w = (t - t_lo) / (tenor - t_lo);
            let k = coupon_payment * df_lo.powf(1.0 - w);
            coeffs.push((k, w));
        }
    }

    // A final stub shorter than a full period scales the last coupon
    let mut delta_last = tenor - if periods > 0 { periods as f64 / freq } else { 0.0 };
    if delta_last <= TINY {
        delta_last = 1.0 / freq;
    }
    let final_payment = coupon_payment * (delta_last * freq) + 1.0;

    Ok((const_pv, coeffs, final_payment))
}

/// Discount factor at `t` from simple-annual zeros, interpolating the
/// zero linearly between pillars.
fn pillar_df(zero_simple: &[(f64, f64)], t: f64) -> f64 {
    let z = interpolate_simple_zero(zero_simple, t);
    (1.0 + z).powf(-t)
}

/// Linear interpolation of simple zeros with flat extrapolation.
fn interpolate_simple_zero(zero_simple: &[(f64, f64)], t: f64) -> f64 {
    if let Some(&(_, z)) = zero_simple.iter().find(|&&(p, _)| (p - t).abs() < TINY) {
        return z;
    }
    let first = zero_simple[0];
    if t <= first.0 {
        return first.1;
    }
    let last = zero_simple[zero_simple.len() - 1];
    if t >= last.0 {
        return last.1;
    }
    let idx = zero_simple.partition_point(|&(p, _)| p < t);
    let (t0, z0) = zero_simple[idx - 1];
    let (t1, z1) = zero_simple[idx];
    z0 + (z1 - z0) * (t - t0) / (t1 - t0)
}

/// True for half-year multiples, plus the quoted 0.75 point.
fn on_half_year_grid(tenor: f64) -> bool {
    (tenor / 0.5 - (tenor / 0.5).round()).abs() <= 1e-9 || (tenor - 0.75).abs() <= 1e-9
}

/// Solves the pillar discount factor on `(1e-12, 1)`.
fn solve_pillar_df<F: Fn(f64) -> f64>(residual: &F, tenor: f64) -> CurveResult<f64> {
    let lo = 1e-12;
    let hi = 1.0;
    let f_lo = residual(lo);
    let f_hi = residual(hi);

    // Degenerate quotes can push the root outside (0, 1); take the
    // endpoint with the smaller residual, as the sequential bootstrap
    // cannot recover anyway.
    if f_lo > 0.0 && f_hi > 0.0 {
        log::warn!("par bootstrap residual positive on both ends at tenor {tenor}");
        return Ok(lo);
    }
    if f_lo < 0.0 && f_hi < 0.0 {
        log::warn!("par bootstrap residual negative on both ends at tenor {tenor}");
        return Ok(hi);
    }

    bisect(residual, lo, hi, &BisectionConfig::new(1e-12, 80))
        .map(|r| r.root)
        .map_err(|e| CurveError::numerical(format!("par tenor {tenor}"), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn s3_par_nodes() -> Vec<(f64, f64)> {
        vec![
            (0.25, 3.00),
            (0.5, 3.10),
            (1.0, 3.20),
            (2.0, 3.30),
            (3.0, 3.40),
            (5.0, 3.50),
        ]
    }

    #[test]
    fn test_short_anchors() {
        let zeros = bootstrap_zero_from_par(&s3_par_nodes(), 2).unwrap();
        // z_cont(0.25) = ln(1 + y)
        assert_relative_eq!(zeros[0].1, (1.0_f64 + 0.030).ln(), epsilon = 1e-14);
        // z_cont(0.5) = ln((1 + y/2)^2)
        assert_relative_eq!(zeros[1].1, (1.0_f64 + 0.0155).powi(2).ln(), epsilon = 1e-14);
    }

    #[test]
    fn test_pillar_count_and_order() {
        let zeros = bootstrap_zero_from_par(&s3_par_nodes(), 2).unwrap();
        let tenors: Vec<f64> = zeros.iter().map(|&(t, _)| t).collect();
        assert_eq!(tenors, vec![0.25, 0.5, 1.0, 2.0, 3.0, 5.0]);
        for w in zeros.windows(2) {
            assert!(w[1].0 > w[0].0);
        }
    }

    #[test]
    fn test_par_quotes_reprice_to_one() {
        // Every quoted par instrument must reprice to par
        let nodes = s3_par_nodes();
        let zeros = bootstrap_zero_from_par(&nodes, 2).unwrap();
        for &(tenor, rate) in &nodes {
            if tenor < 0.5 {
                continue;
            }
            let pv = reprice_par_quote(&zeros, rate, tenor, 2).unwrap();
            assert_relative_eq!(pv, 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_upward_curve_zeros_above_par() {
        // With an upward-sloping par curve, the long simple-annual zero
        // sits above the quoted par yield (coupon drag)
        let zeros = bootstrap_zero_from_par(&s3_par_nodes(), 2).unwrap();
        let z5_cont = zeros.iter().find(|&&(t, _)| t == 5.0).unwrap().1;
        let z5_simple = z5_cont.exp() - 1.0;
        assert!(z5_simple > 0.035, "z_simple(5) = {z5_simple}");
        assert!(z5_simple < 0.036, "z_simple(5) = {z5_simple}");
    }

    #[test]
    fn test_off_grid_tenor_skipped() {
        let nodes = vec![(0.25, 3.0), (0.5, 3.1), (1.0, 3.2), (1.3, 3.25), (2.0, 3.3)];
        let zeros = bootstrap_zero_from_par(&nodes, 2).unwrap();
        assert!(zeros.iter().all(|&(t, _)| t != 1.3));
        assert_eq!(zeros.len(), 4);
    }

    #[test]
    fn test_quoted_075_is_admitted() {
        let nodes = vec![(0.25, 3.0), (0.5, 3.1), (0.75, 3.15), (1.0, 3.2)];
        let zeros = bootstrap_zero_from_par(&nodes, 2).unwrap();
        assert!(zeros.iter().any(|&(t, _)| t == 0.75));
        let pv = reprice_par_quote(&zeros, 3.15, 0.75, 2).unwrap();
        assert_relative_eq!(pv, 1.0, epsilon = 1e-8);
    }

    #[test]
    fn test_missing_anchor_errors() {
        // A 2Y quote with no shorter pillar cannot be bootstrapped
        let nodes = vec![(2.0, 3.3)];
        assert!(bootstrap_zero_from_par(&nodes, 2).is_err());
    }

    #[test]
    fn test_empty_input_errors() {
        assert!(matches!(
            bootstrap_zero_from_par(&[], 2),
            Err(CurveError::EmptyCurve)
        ));
        assert!(bootstrap_zero_from_par(&s3_par_nodes(), 0).is_err());
    }

    #[test]
    fn test_flat_par_curve_zeros_near_flat() {
        let nodes = vec![(0.5, 3.0), (1.0, 3.0), (2.0, 3.0), (3.0, 3.0)];
        let zeros = bootstrap_zero_from_par(&nodes, 2).unwrap();
        // A flat par curve implies a flat zero curve at the street-compounded level
        let expected = (1.0_f64 + 0.015).powi(2).ln();
        for &(_, z) in &zeros {
            assert_relative_eq!(z, expected, epsilon = 1e-10);
        }
    }
}
