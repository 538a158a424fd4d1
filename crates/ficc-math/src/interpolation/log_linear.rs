//! Log-linear interpolation.

use crate::error::{MathError, MathResult};

use super::{segment_index, validated_pairs, Interpolator};

/// Log-linear interpolation: linear in `ln y`, flat beyond the outer
/// pillars.
///
/// For discount factors this is equivalent to linear interpolation of
/// `z(t)·t` in log-DF space, guarantees positivity, and gives piecewise
/// constant forward rates between pillars.
///
/// # Example
///
/// ```rust
/// use ficc_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let times = vec![1.0, 2.0];
/// let dfs = vec![0.96, 0.90];
/// let interp = LogLinearInterpolator::new(times, dfs).unwrap();
/// assert!(interp.value_at(1.5) > 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    log_ys: Vec<f64>,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 2 points, mismatched lengths,
    /// duplicate pillars, or non-positive values.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let (xs, ys) = validated_pairs(xs, ys)?;

        let mut log_ys = Vec::with_capacity(ys.len());
        for (i, &y) in ys.iter().enumerate() {
            if y <= 0.0 {
                return Err(MathError::invalid_input(format!(
                    "value[{i}] = {y} is not positive; log-linear requires positive values"
                )));
            }
            log_ys.push(y.ln());
        }

        Ok(Self { xs, ys, log_ys })
    }
}

impl Interpolator for LogLinearInterpolator {
    fn value_at(&self, x: f64) -> f64 {
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= *self.xs.last().expect("at least two pillars") {
            return *self.ys.last().expect("at least two pillars");
        }

        let i = segment_index(&self.xs, x);
        let w = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        let log_y = self.log_ys[i] + w * (self.log_ys[i + 1] - self.log_ys[i]);
        log_y.exp()
    }

    fn pillars(&self) -> &[f64] {
        &self.xs
    }

    fn values(&self) -> &[f64] {
        &self.ys
    }
}
