//! Linear interpolation.

use crate::error::MathResult;

use super::{segment_index, validated_pairs, Interpolator};

/// Linear interpolation between data points, flat beyond the outer
/// pillars.
///
/// Used for discount factors ("linear-DF") and for zero-rate nodes.
///
/// # Example
///
/// ```rust
/// use ficc_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![0.96, 0.92]).unwrap();
/// assert!((interp.value_at(1.5) - 0.94).abs() < 1e-12);
/// assert_eq!(interp.value_at(0.0), 0.96); // flat extrapolation
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
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

impl Interpolator for LinearInterpolator {
    fn value_at(&self, x: f64) -> f64 {
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= *self.xs.last().expect("at least two pillars") {
            return *self.ys.last().expect("at least two pillars");
        }

        let i = segment_index(&self.xs, x);
        let w = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + w * (self.ys[i + 1] - self.ys[i])
    }

    fn pillars(&self) -> &[f64] {
        &self.xs
    }

    fn values(&self) -> &[f64] {
        &self.ys
    }
}
