//! The KTB zero curve.

use ficc_core::types::Date;

use crate::bootstrap::par::bootstrap_zero_from_par;
use crate::compounding::Compounding;
use crate::error::{CurveError, CurveResult};

/// How a [`ZeroCurve`] was constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    /// Built directly from zero-rate nodes.
    Zero,
    /// Bootstrapped from par-yield nodes (the par nodes are retained).
    Par,
}

/// Piecewise-linear zero curve keyed by tenor in years.
///
/// Zero rates are stored as decimals. Construction from percent inputs is
/// normalized: for zero-kind nodes the whole set is scaled by 0.01 when
/// the largest magnitude exceeds 1; par-kind nodes are normalized value
/// by value.
///
/// Par-kind curves keep their par nodes so that node shifts (key-rate
/// bumps) re-bootstrap rather than shifting the derived zeros.
#[derive(Debug, Clone)]
pub struct ZeroCurve {
    curve_date: Date,
    /// (tenor years, zero rate decimal), strictly increasing tenors.
    nodes: Vec<(f64, f64)>,
    compounding: Compounding,
    kind: CurveKind,
    frequency: u32,
    /// Original par nodes (decimal) for par-kind curves.
    par_nodes: Option<Vec<(f64, f64)>>,
}

impl ZeroCurve {
    /// Creates a zero curve from zero-rate nodes.
    ///
    /// # Errors
    ///
    /// Returns an error when `nodes` is empty or contains non-positive
    /// tenors.
    pub fn new(
        curve_date: Date,
        nodes: &[(f64, f64)],
        compounding: Compounding,
    ) -> CurveResult<Self> {
        let normalized = normalize_zero_nodes(nodes)?;
        Ok(Self {
            curve_date,
            nodes: normalized,
            compounding,
            kind: CurveKind::Zero,
            frequency: 2,
            par_nodes: None,
        })
    }

    /// Bootstraps a zero curve from par-yield nodes.
    ///
    /// `frequency` is the coupon frequency of the par instruments
    /// (payments per year, 2 for KTB).
    ///
    /// # Errors
    ///
    /// Returns an error when the node set is empty, tenors are
    /// non-positive, or the bootstrap fails.
    pub fn from_par_yields(
        curve_date: Date,
        par_nodes: &[(f64, f64)],
        compounding: Compounding,
        frequency: u32,
    ) -> CurveResult<Self> {
        if frequency == 0 {
            return Err(CurveError::invalid_data("frequency must be positive"));
        }
        let par_decimal = normalize_par_nodes(par_nodes)?;
        let zeros = bootstrap_zero_from_par(&par_decimal, frequency)?;
        Ok(Self {
            curve_date,
            nodes: zeros,
            compounding,
            kind: CurveKind::Par,
            frequency,
            par_nodes: Some(par_decimal),
        })
    }

    /// The curve reference date.
    #[must_use]
    pub fn curve_date(&self) -> Date {
        self.curve_date
    }

    /// The construction kind.
    #[must_use]
    pub fn kind(&self) -> CurveKind {
        self.kind
    }

    /// The compounding mode used by [`ZeroCurve::df`].
    #[must_use]
    pub fn compounding(&self) -> Compounding {
        self.compounding
    }

    /// The zero-rate nodes (tenor years, decimal rate).
    #[must_use]
    pub fn nodes(&self) -> &[(f64, f64)] {
        &self.nodes
    }

    /// The retained par nodes (decimal) for par-kind curves.
    #[must_use]
    pub fn par_nodes(&self) -> Option<&[(f64, f64)]> {
        self.par_nodes.as_deref()
    }

    /// Interpolated zero rate (decimal) at tenor `t`, flat at the ends.
    #[must_use]
    pub fn zero(&self, t: f64) -> f64 {
        let first = self.nodes[0];
        if t <= first.0 {
            return first.1;
        }
        let last = self.nodes[self.nodes.len() - 1];
        if t >= last.0 {
            return last.1;
        }
        let idx = self.nodes.partition_point(|&(tenor, _)| tenor < t);
        let (t0, z0) = self.nodes[idx - 1];
        let (t1, z1) = self.nodes[idx];
        let w = (t - t0) / (t1 - t0);
        z0 + (z1 - z0) * w
    }

    /// Discount factor at tenor `t` under the curve's compounding.
    #[must_use]
    pub fn df(&self, t: f64) -> f64 {
        self.compounding.df(self.zero(t), t)
    }

    /// Returns a new curve with one node shifted by `shift_bp` basis points.
    ///
    /// Par-kind curves shift the par node (interpolating one in when the
    /// tenor is not quoted) and re-bootstrap; zero-kind curves shift the
    /// zero node directly.
    ///
    /// # Errors
    ///
    /// Propagates re-bootstrap errors for par-kind curves.
    pub fn with_shifted_node(&self, tenor: f64, shift_bp: f64) -> CurveResult<Self> {
        let shift = shift_bp / 10_000.0;

        if let (CurveKind::Par, Some(par)) = (self.kind, self.par_nodes.as_ref()) {
            let mut bumped = par.clone();
            let base = lookup_or_interpolate(par, tenor);
            upsert_node(&mut bumped, tenor, base + shift);
            return Self::from_par_yields(
                self.curve_date,
                &bumped,
                self.compounding,
                self.frequency,
            );
        }

        let mut nodes = self.nodes.clone();
        let base = lookup_or_interpolate(&nodes, tenor);
        upsert_node(&mut nodes, tenor, base + shift);
        Ok(Self {
            curve_date: self.curve_date,
            nodes,
            compounding: self.compounding,
            kind: CurveKind::Zero,
            frequency: self.frequency,
            par_nodes: None,
        })
    }
}

/// Scales a whole node set from percent to decimal when needed.
fn normalize_zero_nodes(nodes: &[(f64, f64)]) -> CurveResult<Vec<(f64, f64)>> {
    if nodes.is_empty() {
        return Err(CurveError::EmptyCurve);
    }
    let max_abs = nodes
        .iter()
        .map(|&(_, r)| r.abs())
        .fold(0.0_f64, f64::max);
    let scale = if max_abs > 1.0 { 0.01 } else { 1.0 };

    let mut out = Vec::with_capacity(nodes.len());
    for &(tenor, rate) in nodes {
        if tenor <= 0.0 {
            return Err(CurveError::invalid_data(format!(
                "tenor must be positive, got {tenor}"
            )));
        }
        out.push((tenor, rate * scale));
    }
    out.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("tenor is not NaN"));
    out.dedup_by(|a, b| a.0 == b.0);
    Ok(out)
}

/// Normalizes par nodes value by value (|rate| >= 1 means percent).
fn normalize_par_nodes(nodes: &[(f64, f64)]) -> CurveResult<Vec<(f64, f64)>> {
    if nodes.is_empty() {
        return Err(CurveError::EmptyCurve);
    }
    let mut out = Vec::with_capacity(nodes.len());
    for &(tenor, rate) in nodes {
        if tenor <= 0.0 {
            return Err(CurveError::invalid_data(format!(
                "tenor must be positive, got {tenor}"
            )));
        }
        let value = if rate.abs() >= 1.0 { rate / 100.0 } else { rate };
        out.push((tenor, value));
    }
    out.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("tenor is not NaN"));
    out.dedup_by(|a, b| a.0 == b.0);
    Ok(out)
}

/// Looks up a node value, falling back to linear interpolation.
fn lookup_or_interpolate(nodes: &[(f64, f64)], tenor: f64) -> f64 {
    if let Some(&(_, v)) = nodes.iter().find(|&&(t, _)| t == tenor) {
        return v;
    }
    let first = nodes[0];
    if tenor <= first.0 {
        return first.1;
    }
    let last = nodes[nodes.len() - 1];
    if tenor >= last.0 {
        return last.1;
    }
    let idx = nodes.partition_point(|&(t, _)| t < tenor);
    let (t0, v0) = nodes[idx - 1];
    let (t1, v1) = nodes[idx];
    v0 + (v1 - v0) * (tenor - t0) / (t1 - t0)
}

/// Inserts or replaces the node at `tenor`, keeping the set sorted.
fn upsert_node(nodes: &mut Vec<(f64, f64)>, tenor: f64, value: f64) {
    if let Some(node) = nodes.iter_mut().find(|(t, _)| *t == tenor) {
        node.1 = value;
        return;
    }
    let idx = nodes.partition_point(|&(t, _)| t < tenor);
    nodes.insert(idx, (tenor, value));
}
