//! Piecewise-constant interpolation.

use crate::error::MathResult;

use super::{validated_pairs, Interpolator};

/// Piecewise-constant (left-endpoint) interpolation.
///
/// Returns the value at the nearest pillar on or before `x`; flat beyond
/// the outer pillars.
#[derive(Debug, Clone)]
pub struct PiecewiseConstantInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PiecewiseConstantInterpolator {
    /// Creates a new piecewise-constant interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 2 points, mismatched lengths, or
    /// duplicate pillars.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let (xs, ys) = validated_pairs(xs, ys)?;
        Ok(Self { xs, ys })
    }
}

impl Interpolator for PiecewiseConstantInterpolator {
    fn value_at(&self, x: f64) -> f64 {
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= *self.xs.last().expect("at least two pillars") {
            return *self.ys.last().expect("at least two pillars");
        }

        // Left endpoint of the containing interval
        let i = self.xs.partition_point(|&p| p <= x) - 1;
        self.ys[i]
    }

    fn pillars(&self) -> &[f64] {
        &self.xs
    }

    fn values(&self) -> &[f64] {
        &self.ys
    }
}
