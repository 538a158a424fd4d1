//! Discount factors bootstrapped from cash bond prices.
//!
//! Each bond pins the discount factor at its final cash flow date.
//! Bonds are processed shortest-last-flow first; a bond whose earlier
//! cash flows fall before any known pillar is deferred and retried, and
//! the bootstrap aborts when a full pass makes no progress.

use std::collections::{BTreeMap, VecDeque};

use ficc_core::types::{Cashflow, Date};
use ficc_curves::bootstrap::{zero_grid_from_nodes, DiscountFactorNode};
use ficc_curves::CurveError;
use ficc_math::solvers::{bisect, BisectionConfig};

use crate::bond::Ktb;
use crate::error::{BondError, BondResult};

/// A cash bond quote: terms plus a dirty market price.
#[derive(Debug, Clone, PartialEq)]
pub struct BondQuote {
    /// Issue date.
    pub issue: Date,
    /// Maturity date.
    pub maturity: Date,
    /// Coupon rate in percent.
    pub coupon_percent: f64,
    /// Dirty price on the bond's face.
    pub dirty_price: f64,
}

impl BondQuote {
    /// Creates a quote.
    #[must_use]
    pub fn new(issue: Date, maturity: Date, coupon_percent: f64, dirty_price: f64) -> Self {
        Self {
            issue,
            maturity,
            coupon_percent,
            dirty_price,
        }
    }
}

/// Bootstraps dated discount factors from dirty bond prices.
///
/// For each bond (shortest final flow first) the final-flow discount
/// factor solves
///
/// ```text
/// const_pv + last_amount * df + sum K_j * df^{a_j} = dirty_price
/// ```
///
/// where earlier flows discount at known pillars (log-linear between
/// them) and flows between the last known pillar and the bond's final
/// date are parameterized log-linearly in the unknown. Bonds that still
/// lack any usable earlier pillar go back on the queue.
///
/// # Errors
///
/// Returns an error when a pass over the queue solves nothing
/// ([`CurveError::NoProgress`]) or a pillar solve fails numerically.
pub fn bootstrap_discount_nodes(
    bonds: &[BondQuote],
    valuation_date: Date,
    payments_per_year: u32,
) -> BondResult<Vec<DiscountFactorNode>> {
    struct QueuedBond {
        quote: BondQuote,
        flows: Vec<Cashflow>,
    }

    let mut items = Vec::new();
    for quote in bonds {
        let bond = Ktb::with_conventions(
            quote.issue,
            quote.maturity,
            quote.coupon_percent,
            payments_per_year,
            crate::bond::DEFAULT_FACE,
        )?;
        let flows: Vec<Cashflow> = bond
            .cash_flows()
            .into_iter()
            .filter(|cf| cf.date > valuation_date)
            .collect();
        if flows.is_empty() {
            continue;
        }
        items.push(QueuedBond {
            quote: quote.clone(),
            flows,
        });
    }
    items.sort_by_key(|item| item.flows.last().expect("non-empty").date);

    let mut queue: VecDeque<QueuedBond> = items.into();
    let mut df_by_date: BTreeMap<Date, f64> = BTreeMap::new();

    let mut progressed = true;
    while !queue.is_empty() && progressed {
        progressed = false;
        for _ in 0..queue.len() {
            let item = queue.pop_front().expect("queue is non-empty");

            match pillar_terms(&item.flows, &df_by_date) {
                Some((const_pv, coeffs, last_amount)) => {
                    let dirty = item.quote.dirty_price;
                    let final_date = item.flows.last().expect("non-empty").date;
                    let residual = |df: f64| {
                        let mut s = const_pv + last_amount * df;
                        for &(k, a) in &coeffs {
                            s += k * df.powf(a);
                        }
                        s - dirty
                    };
                    let df = solve_final_df(&residual, &item.quote)?;
                    df_by_date.insert(final_date, df.clamp(1e-12, 1.0));
                    progressed = true;
                }
                None => queue.push_back(item),
            }
        }
    }

    if !queue.is_empty() {
        let pending: Vec<String> = queue
            .iter()
            .map(|item| format!("{}/{}", item.quote.issue, item.quote.maturity))
            .collect();
        return Err(BondError::Curve(CurveError::NoProgress {
            pending: pending.join(", "),
        }));
    }

    Ok(df_by_date
        .into_iter()
        .map(|(date, df)| {
            let years = valuation_date.days_between(&date) as f64 / 365.0;
            DiscountFactorNode::new(date, df, years)
        })
        .collect())
}

/// Bootstraps bonds and resamples onto the half-year zero grid
/// (simple-annual zeros in percent).
///
/// # Errors
///
/// Propagates bootstrap failures.
pub fn zero_curve_from_bonds(
    bonds: &[BondQuote],
    valuation_date: Date,
    payments_per_year: u32,
    max_tenor: Option<f64>,
) -> BondResult<Vec<(f64, f64)>> {
    let nodes = bootstrap_discount_nodes(bonds, valuation_date, payments_per_year)?;
    Ok(zero_grid_from_nodes(&nodes, max_tenor))
}

/// Decomposes one bond's PV into known, parameterized, and final terms.
///
/// Returns `None` when some earlier flow has no pillar below it yet
/// (the bond must wait for shorter bonds to resolve).
fn pillar_terms(
    flows: &[Cashflow],
    df_by_date: &BTreeMap<Date, f64>,
) -> Option<(f64, Vec<(f64, f64)>, f64)> {
    let final_date = flows.last().expect("non-empty").date;
    let mut const_pv = 0.0;
    let mut coeffs: Vec<(f64, f64)> = Vec::new();

    for cf in &flows[..flows.len() - 1] {
        if let Some(&df) = df_by_date.get(&cf.date) {
            const_pv += cf.amount * df;
            continue;
        }
        if df_by_date.is_empty() {
            return None;
        }

        let below = df_by_date.range(..cf.date).next_back();
        let above = df_by_date.range(cf.date..).next();
        match (below, above) {
            (None, _) => return None,
            (Some((&d_lo, &df_lo)), Some((&d_hi, &df_hi))) => {
                let w = d_lo.days_between(&cf.date) as f64 / d_lo.days_between(&d_hi) as f64;
                let ln_df = df_lo.ln() + w * (df_hi.ln() - df_lo.ln());
                const_pv += cf.amount * ln_df.exp();
            }
            (Some((&d_lo, &df_lo)), None) => {
                if cf.date >= final_date {
                    return None;
                }
                let span = d_lo.days_between(&final_date) as f64;
                let alpha = d_lo.days_between(&cf.date) as f64 / span;
                let k = cf.amount * df_lo.powf(cf.date.days_between(&final_date) as f64 / span);
                coeffs.push((k, alpha));
            }
        }
    }

    let last_amount = flows.last().expect("non-empty").amount;
    Some((const_pv, coeffs, last_amount))
}

/// Solves a final-flow discount factor on `(1e-10, 1)`.
fn solve_final_df<F: Fn(f64) -> f64>(residual: &F, quote: &BondQuote) -> BondResult<f64> {
    let lo = 1e-10;
    let hi = 1.0;
    let f_lo = residual(lo);
    let f_hi = residual(hi);

    if f_lo > 0.0 && f_hi > 0.0 {
        log::warn!(
            "bond bootstrap residual positive on both ends for {}/{}",
            quote.issue,
            quote.maturity
        );
        return Ok(lo);
    }
    if f_lo < 0.0 && f_hi < 0.0 {
        log::warn!(
            "bond bootstrap residual negative on both ends for {}/{}",
            quote.issue,
            quote.maturity
        );
        return Ok(hi);
    }

    bisect(residual, lo, hi, &BisectionConfig::new(1e-10, 80))
        .map(|r| r.root)
        .map_err(|e| {
            BondError::numerical(format!("bond {}/{}", quote.issue, quote.maturity), e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ficc_core::daycounts::{Act365Fixed, DayCount};

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    /// Prices a bond's future flows on a reference flat continuous curve.
    fn flat_dirty_price(bond: &Ktb, valuation: Date, rate: f64) -> f64 {
        bond.cash_flows()
            .iter()
            .filter(|cf| cf.date > valuation)
            .map(|cf| {
                let t = Act365Fixed.year_fraction(valuation, cf.date);
                cf.amount * (-rate * t).exp()
            })
            .sum()
    }

    fn quotes_on_flat_curve(valuation: Date, rate: f64) -> Vec<BondQuote> {
        // The shortest bond has a single remaining flow: it seeds the
        // first pillar that every longer bond interpolates against.
        [
            (d("2023-12-30"), d("2025-12-30"), 3.0),
            (d("2024-12-30"), d("2026-06-30"), 3.1),
            (d("2024-06-30"), d("2027-06-30"), 3.2),
            (d("2022-06-30"), d("2030-06-30"), 3.5),
        ]
        .into_iter()
        .map(|(issue, maturity, coupon)| {
            let bond = Ktb::new(issue, maturity, coupon).unwrap();
            BondQuote::new(issue, maturity, coupon, flat_dirty_price(&bond, valuation, rate))
        })
        .collect()
    }

    #[test]
    fn test_recovers_flat_curve() {
        let valuation = d("2025-06-30");
        let rate = 0.03;
        let quotes = quotes_on_flat_curve(valuation, rate);

        let nodes = bootstrap_discount_nodes(&quotes, valuation, 2).unwrap();
        assert_eq!(nodes.len(), 4);

        // Each pillar reproduces the generating curve's discount factor:
        // flat continuous curves are exact under log-linear-in-days
        // interpolation, so only solver tolerance remains
        for node in &nodes {
            let t = Act365Fixed.year_fraction(valuation, node.date);
            assert_relative_eq!(node.discount_factor, (-rate * t).exp(), max_relative = 1e-8);
        }
    }

    #[test]
    fn test_quotes_reprice_exactly() {
        // The defining property: each quoted dirty price comes back when
        // the bond reprices off the bootstrapped nodes
        let valuation = d("2025-06-30");
        let quotes = quotes_on_flat_curve(valuation, 0.03);
        let nodes = bootstrap_discount_nodes(&quotes, valuation, 2).unwrap();

        for quote in &quotes {
            let bond = Ktb::new(quote.issue, quote.maturity, quote.coupon_percent).unwrap();
            let repriced = bond.price_from_discount_nodes(valuation, &nodes);
            assert_relative_eq!(repriced, quote.dirty_price, max_relative = 5e-4);
        }
    }

    #[test]
    fn test_pillars_increase_with_maturity() {
        let valuation = d("2025-06-30");
        let quotes = quotes_on_flat_curve(valuation, 0.03);
        let nodes = bootstrap_discount_nodes(&quotes, valuation, 2).unwrap();
        for w in nodes.windows(2) {
            assert!(w[1].date > w[0].date);
            assert!(w[1].discount_factor < w[0].discount_factor);
        }
    }

    #[test]
    fn test_matured_bonds_are_skipped() {
        let valuation = d("2025-06-30");
        let mut quotes = quotes_on_flat_curve(valuation, 0.03);
        quotes.push(BondQuote::new(d("2015-06-30"), d("2020-06-30"), 3.0, 10_000.0));
        let nodes = bootstrap_discount_nodes(&quotes, valuation, 2).unwrap();
        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_zero_grid_output() {
        let valuation = d("2025-06-30");
        let quotes = quotes_on_flat_curve(valuation, 0.03);
        let grid = zero_curve_from_bonds(&quotes, valuation, 2, None).unwrap();
        assert!(!grid.is_empty());
        // Simple-annual zeros in percent near exp(0.03) - 1
        for &(_, z_pct) in &grid {
            assert_relative_eq!(z_pct / 100.0, 0.03_f64.exp() - 1.0, max_relative = 2e-2);
        }
    }
}
