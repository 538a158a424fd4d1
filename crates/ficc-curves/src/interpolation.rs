//! Interpolation method selection for curves.

use serde::{Deserialize, Serialize};
use std::fmt;

use ficc_math::interpolation::{
    Interpolator, LinearInterpolator, LogLinearInterpolator, PiecewiseConstantInterpolator,
    StepForwardInterpolator,
};

use crate::error::{CurveError, CurveResult};

/// Interpolation methods available on discount and projection curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Linear interpolation directly on discount factors.
    LinearDf,
    /// Linear in log-DF (equivalently, zero rates weighted by time).
    LogLinearZero,
    /// Piecewise-constant, left endpoint.
    PiecewiseConstant,
    /// Piecewise-constant instantaneous forward rates.
    StepForwardContinuous,
}

impl InterpolationMethod {
    /// Conventional name used in curve artifacts.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationMethod::LinearDf => "LINEAR_DF",
            InterpolationMethod::LogLinearZero => "LOGLINEAR_ZERO",
            InterpolationMethod::PiecewiseConstant => "PIECEWISE_CONSTANT",
            InterpolationMethod::StepForwardContinuous => "STEP_FORWARD_CONTINUOUS",
        }
    }

    /// Builds the interpolation kernel over discount-factor pillars.
    ///
    /// # Errors
    ///
    /// Propagates kernel construction errors (too few points, duplicate
    /// or non-positive pillars).
    pub fn build(
        &self,
        times: Vec<f64>,
        discount_factors: Vec<f64>,
    ) -> CurveResult<Box<dyn Interpolator>> {
        let interp: Box<dyn Interpolator> = match self {
            InterpolationMethod::LinearDf => Box::new(
                LinearInterpolator::new(times, discount_factors)
                    .map_err(|e| CurveError::numerical("interpolator", e))?,
            ),
            InterpolationMethod::LogLinearZero => Box::new(
                LogLinearInterpolator::new(times, discount_factors)
                    .map_err(|e| CurveError::numerical("interpolator", e))?,
            ),
            InterpolationMethod::PiecewiseConstant => Box::new(
                PiecewiseConstantInterpolator::new(times, discount_factors)
                    .map_err(|e| CurveError::numerical("interpolator", e))?,
            ),
            InterpolationMethod::StepForwardContinuous => Box::new(
                StepForwardInterpolator::new(times, discount_factors)
                    .map_err(|e| CurveError::numerical("interpolator", e))?,
            ),
        };
        Ok(interp)
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for InterpolationMethod {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().trim() {
            "LINEAR_DF" => Ok(InterpolationMethod::LinearDf),
            "LOGLINEAR_ZERO" | "LOG_LINEAR_ZERO" => Ok(InterpolationMethod::LogLinearZero),
            "PIECEWISE_CONSTANT" => Ok(InterpolationMethod::PiecewiseConstant),
            "STEP_FORWARD" | "STEP_FORWARD_CONTINUOUS" => {
                Ok(InterpolationMethod::StepForwardContinuous)
            }
            other => Err(CurveError::UnsupportedInterpolation { name: other.into() }),
        }
    }
}
