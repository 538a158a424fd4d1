//! Grids derived from bootstrapped discount-factor nodes.
//!
//! The cash-bond bootstrap produces dated discount factors. These
//! helpers resample them onto the half-year tenor grid as simple-annual
//! zero rates or implied par yields.

use serde::{Deserialize, Serialize};

use ficc_core::types::Date;

/// A discount factor at a dated pillar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountFactorNode {
    /// The pillar date.
    pub date: Date,
    /// Discount factor from the valuation date to `date`.
    pub discount_factor: f64,
    /// Years from valuation (ACT/365F), kept for interpolation.
    pub years_from_valuation: f64,
}

impl DiscountFactorNode {
    /// Creates a node.
    #[must_use]
    pub fn new(date: Date, discount_factor: f64, years_from_valuation: f64) -> Self {
        Self {
            date,
            discount_factor,
            years_from_valuation,
        }
    }
}

/// The half-year grid up to `max_tenor`: 0.5, 1.0, 1.5, ...
fn half_year_grid(max_tenor: f64) -> Vec<f64> {
    let n = (max_tenor / 0.5).floor() as i64;
    (1..=n).map(|k| 0.5 * k as f64).collect()
}

/// Interpolates `ln df` linearly in time with flat extrapolation.
fn interpolate_ln_df(nodes: &[DiscountFactorNode], t: f64) -> f64 {
    let first = &nodes[0];
    if t <= first.years_from_valuation {
        return first.discount_factor.ln();
    }
    let last = &nodes[nodes.len() - 1];
    if t >= last.years_from_valuation {
        return last.discount_factor.ln();
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
    ln0 + (ln1 - ln0) * (t - t0) / (t1 - t0)
}

/// Linear interpolation of raw discount factors with flat extrapolation.
fn interpolate_df(nodes: &[DiscountFactorNode], t: f64) -> f64 {
    let first = &nodes[0];
    if t <= first.years_from_valuation {
        return first.discount_factor;
    }
    let last = &nodes[nodes.len() - 1];
    if t >= last.years_from_valuation {
        return last.discount_factor;
    }
    let idx = nodes.partition_point(|n| n.years_from_valuation < t);
    let (t0, d0) = (
        nodes[idx - 1].years_from_valuation,
        nodes[idx - 1].discount_factor,
    );
    let (t1, d1) = (nodes[idx].years_from_valuation, nodes[idx].discount_factor);
    d0 + (d1 - d0) * (t - t0) / (t1 - t0)
}

/// Resamples discount nodes onto the half-year grid as simple-annual
/// zero rates in percent: `z(t) = df(t)^(-1/t) - 1`.
///
/// Discount factors between nodes interpolate log-linearly in time.
/// Returns an empty grid for an empty node set.
#[must_use]
pub fn zero_grid_from_nodes(
    nodes: &[DiscountFactorNode],
    max_tenor: Option<f64>,
) -> Vec<(f64, f64)> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let max_t = max_tenor.unwrap_or_else(|| {
        nodes
            .iter()
            .map(|n| n.years_from_valuation)
            .fold(0.0, f64::max)
    });

    half_year_grid(max_t)
        .into_iter()
        .map(|t| {
            let df = interpolate_ln_df(nodes, t).exp();
            let z = df.powf(-1.0 / t) - 1.0;
            (t, z * 100.0)
        })
        .collect()
}

/// Implied semiannual par yields (percent) on the half-year grid.
///
/// For each grid tenor the par yield solves
/// `y/2 * sum df(t_k) + df(T) = 1` over the half-year coupon dates; a
/// degenerate annuity falls back to the zero-coupon equivalent yield.
#[must_use]
pub fn par_curve_from_nodes(nodes: &[DiscountFactorNode], max_tenor: f64) -> Vec<(f64, f64)> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let actual_max = max_tenor.min(
        nodes
            .iter()
            .map(|n| n.years_from_valuation)
            .fold(0.0, f64::max),
    );

    half_year_grid(actual_max)
        .into_iter()
        .map(|tenor| {
            let df_maturity = interpolate_df(nodes, tenor);
            let coupon_times = half_year_grid(tenor);
            // Annuity excludes the maturity payment itself
            let annuity: f64 = coupon_times[..coupon_times.len() - 1]
                .iter()
                .map(|&t| interpolate_df(nodes, t))
                .sum();

            let ytm = if annuity > 0.0 {
                2.0 * (1.0 - df_maturity) / (annuity + df_maturity)
            } else {
                2.0 * (df_maturity.powf(-1.0 / (2.0 * tenor)) - 1.0)
            };
            (tenor, ytm * 100.0)
        })
        .collect()
}
