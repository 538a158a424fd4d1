//! Step-forward (continuous) interpolation.

use crate::error::{MathError, MathResult};

use super::{segment_index, validated_pairs, Interpolator};

/// Step-forward-continuous interpolation of discount factors.
///
/// The instantaneous forward rate is piecewise constant between pillars:
///
/// ```text
/// DF(t) = DF(t_i) * exp(-f_i * (t - t_i)),   f_i = ln(DF_i / DF_{i+1}) / (t_{i+1} - t_i)
/// ```
///
/// Extrapolation is not flat: below the first pillar the first pillar's
/// continuously compounded zero rate `z0 = -ln(DF_0)/t_0` extends to
/// `t = 0` (so `DF(0) = 1`); above the last pillar the last forward rate
/// extends indefinitely.
#[derive(Debug, Clone)]
pub struct StepForwardInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    forwards: Vec<f64>,
}

impl StepForwardInterpolator {
    /// Creates a new step-forward interpolator over discount factors.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than 2 points, mismatched lengths,
    /// duplicate pillars, non-positive values, or a non-positive first
    /// pillar time.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        let (xs, ys) = validated_pairs(xs, ys)?;

        if xs[0] <= 0.0 {
            return Err(MathError::invalid_input(
                "step-forward interpolation requires a positive first pillar time",
            ));
        }
        for (i, &y) in ys.iter().enumerate() {
            if y <= 0.0 {
                return Err(MathError::invalid_input(format!(
                    "discount factor[{i}] = {y} is not positive"
                )));
            }
        }

        let forwards = xs
            .windows(2)
            .zip(ys.windows(2))
            .map(|(t, df)| (df[0] / df[1]).ln() / (t[1] - t[0]))
            .collect();

        Ok(Self { xs, ys, forwards })
    }

    /// The piecewise-constant forward rates between adjacent pillars.
    #[must_use]
    pub fn forward_rates(&self) -> &[f64] {
        &self.forwards
    }
}

impl Interpolator for StepForwardInterpolator {
    fn value_at(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 1.0;
        }
        if x <= self.xs[0] {
            let z0 = -self.ys[0].ln() / self.xs[0];
            return (-z0 * x).exp();
        }
        let last = self.xs.len() - 1;
        if x >= self.xs[last] {
            let f = self.forwards[last - 1];
            return self.ys[last] * (-f * (x - self.xs[last])).exp();
        }

        let i = segment_index(&self.xs, x);
        self.ys[i] * (-self.forwards[i] * (x - self.xs[i])).exp()
    }

    fn pillars(&self) -> &[f64] {
        &self.xs
    }

    fn values(&self) -> &[f64] {
        &self.ys
    }
}
