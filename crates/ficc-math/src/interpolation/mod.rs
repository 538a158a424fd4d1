//! Interpolation kernels for curve construction.
//!
//! All kernels store sorted pillars and extrapolate flat beyond the
//! outer pillars, except [`StepForwardInterpolator`] which documents its
//! own extensions.

mod linear;
mod log_linear;
mod piecewise_constant;
mod step_forward;

pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;
pub use piecewise_constant::PiecewiseConstantInterpolator;
pub use step_forward::StepForwardInterpolator;

use crate::error::{MathError, MathResult};

/// Trait for interpolation over sorted pillar points.
pub trait Interpolator: Send + Sync {
    /// Interpolates the value at `x`.
    fn value_at(&self, x: f64) -> f64;

    /// Pillar x-coordinates, sorted ascending.
    fn pillars(&self) -> &[f64];

    /// Pillar values.
    fn values(&self) -> &[f64];

    /// Smallest pillar.
    fn min_x(&self) -> f64 {
        self.pillars()[0]
    }

    /// Largest pillar.
    fn max_x(&self) -> f64 {
        *self.pillars().last().expect("at least two pillars")
    }
}

/// Validates and sorts pillar/value pairs for kernel constructors.
///
/// Requires at least two points, matching lengths, and strictly
/// increasing x after sorting (duplicates are rejected).
pub(crate) fn validated_pairs(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<(Vec<f64>, Vec<f64>)> {
    if xs.len() < 2 {
        return Err(MathError::insufficient_data(2, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "pillars and values must have the same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }

    let mut pairs: Vec<(f64, f64)> = xs.into_iter().zip(ys).collect();
    pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("pillar is not NaN"));

    for w in pairs.windows(2) {
        if w[1].0 <= w[0].0 {
            return Err(MathError::invalid_input(
                "pillar points must be strictly increasing",
            ));
        }
    }

    Ok(pairs.into_iter().unzip())
}

/// Finds `i` such that `xs[i] <= x < xs[i+1]`, clamped to the last segment.
pub(crate) fn segment_index(xs: &[f64], x: f64) -> usize {
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).expect("pillar is not NaN")) {
        Ok(i) => i.min(xs.len() - 2),
        Err(i) => i.saturating_sub(1).min(xs.len() - 2),
    }
}
