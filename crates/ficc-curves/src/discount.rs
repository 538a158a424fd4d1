//! OIS discount curve.

use std::sync::Arc;

use ficc_core::daycounts::{Act365Fixed, DayCount};
use ficc_core::types::Date;
use ficc_math::interpolation::Interpolator;

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;

/// Tolerated discount-factor increase between adjacent pillars.
const MONOTONICITY_TOLERANCE: f64 = 1e-6;

/// A discount curve over ACT/365F pillar times.
///
/// Stores discount factors at increasing pillar times measured from the
/// reference date and interpolates with a configurable kernel
/// (step-forward-continuous for bootstrapped OIS curves). Discount
/// factors must be positive; small non-monotone increases are tolerated
/// for numerical stability and larger ones are logged.
///
/// The curve is immutable; [`DiscountCurve::with_spot_stub`] and
/// [`DiscountCurve::shift_parallel`] produce new curves.
#[derive(Clone)]
pub struct DiscountCurve {
    reference_date: Date,
    pillar_times: Vec<f64>,
    discount_factors: Vec<f64>,
    interpolation: InterpolationMethod,
    interpolator: Arc<dyn Interpolator>,
    name: String,
}

impl std::fmt::Debug for DiscountCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscountCurve")
            .field("reference_date", &self.reference_date)
            .field("pillar_times", &self.pillar_times)
            .field("discount_factors", &self.discount_factors)
            .field("interpolation", &self.interpolation)
            .field("name", &self.name)
            .finish()
    }
}

impl DiscountCurve {
    /// Creates a new discount curve.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer than 2 pillars are given, lengths
    /// differ, times are not strictly increasing, or any discount
    /// factor is non-positive.
    pub fn new(
        reference_date: Date,
        pillar_times: Vec<f64>,
        discount_factors: Vec<f64>,
        interpolation: InterpolationMethod,
        name: impl Into<String>,
    ) -> CurveResult<Self> {
        if pillar_times.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        if pillar_times.len() != discount_factors.len() {
            return Err(CurveError::invalid_data(format!(
                "pillar_times ({}) and discount_factors ({}) must have the same length",
                pillar_times.len(),
                discount_factors.len()
            )));
        }
        if pillar_times.len() < 2 {
            return Err(CurveError::invalid_data("need at least 2 pillar points"));
        }
        for w in pillar_times.windows(2) {
            if w[1] <= w[0] {
                return Err(CurveError::non_monotone(format!(
                    "{} does not exceed {}",
                    w[1], w[0]
                )));
            }
        }
        for (i, &df) in discount_factors.iter().enumerate() {
            if df <= 0.0 {
                return Err(CurveError::invalid_data(format!(
                    "discount_factor[{i}] = {df} is not positive"
                )));
            }
        }
        for (i, w) in discount_factors.windows(2).enumerate() {
            let increase = w[1] - w[0];
            if increase > MONOTONICITY_TOLERANCE {
                log::warn!(
                    "discount factors increase at pillar {} (increase = {increase:.8})",
                    i + 1
                );
            }
        }

        let name = name.into();
        let interpolator: Arc<dyn Interpolator> = interpolation
            .build(pillar_times.clone(), discount_factors.clone())?
            .into();

        Ok(Self {
            reference_date,
            pillar_times,
            discount_factors,
            interpolation,
            interpolator,
            name,
        })
    }

    /// A flat curve at a continuously compounded rate, for tests.
    ///
    /// # Errors
    ///
    /// Propagates construction errors.
    pub fn flat(
        reference_date: Date,
        rate: f64,
        max_time: f64,
        name: impl Into<String>,
    ) -> CurveResult<Self> {
        let times: Vec<f64> = (1..=10).map(|i| max_time * f64::from(i) / 10.0).collect();
        let dfs: Vec<f64> = times.iter().map(|&t| (-rate * t).exp()).collect();
        Self::new(
            reference_date,
            times,
            dfs,
            InterpolationMethod::StepForwardContinuous,
            name,
        )
    }

    /// The curve reference date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// The curve name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The pillar times in years (ACT/365F from the reference date).
    #[must_use]
    pub fn pillar_times(&self) -> &[f64] {
        &self.pillar_times
    }

    /// The discount factors at the pillars.
    #[must_use]
    pub fn discount_factors(&self) -> &[f64] {
        &self.discount_factors
    }

    /// The interpolation method.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Discount factor at time `t` (years from the reference date).
    ///
    /// Times at or before the reference date discount to 1.
    #[must_use]
    pub fn df(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        self.interpolator.value_at(t)
    }

    /// Discount factor at a date, on the curve's ACT/365F time axis.
    #[must_use]
    pub fn df_at(&self, date: Date) -> f64 {
        self.df(self.time_of(date))
    }

    /// Continuously compounded zero rate at time `t`.
    #[must_use]
    pub fn zero(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        -self.df(t).ln() / t
    }

    /// ACT/365F year fraction from the reference date to `date`.
    #[must_use]
    pub fn time_of(&self, date: Date) -> f64 {
        Act365Fixed.year_fraction(self.reference_date, date)
    }

    /// Returns a curve with an explicit near-spot pillar prepended.
    ///
    /// No-op when the stub time is non-positive, not below the first
    /// pillar, or the stub discount is outside (0, 1).
    ///
    /// # Errors
    ///
    /// Propagates construction errors.
    pub fn with_spot_stub(&self, stub_time: f64, stub_discount: f64) -> CurveResult<Self> {
        if stub_time <= 0.0
            || stub_time >= self.pillar_times[0]
            || stub_discount <= 0.0
            || stub_discount >= 1.0
        {
            return Ok(self.clone());
        }

        let mut times = Vec::with_capacity(self.pillar_times.len() + 1);
        times.push(stub_time);
        times.extend_from_slice(&self.pillar_times);
        let mut dfs = Vec::with_capacity(self.discount_factors.len() + 1);
        dfs.push(stub_discount);
        dfs.extend_from_slice(&self.discount_factors);

        Self::new(
            self.reference_date,
            times,
            dfs,
            self.interpolation,
            self.name.clone(),
        )
    }

    /// Returns a curve with all zero rates shifted by `shift_bp`.
    ///
    /// # Errors
    ///
    /// Propagates construction errors.
    pub fn shift_parallel(&self, shift_bp: f64) -> CurveResult<Self> {
        let shift = shift_bp / 10_000.0;
        let dfs: Vec<f64> = self
            .pillar_times
            .iter()
            .zip(&self.discount_factors)
            .map(|(&t, &df)| {
                if t > 0.0 {
                    let zero = -df.ln() / t;
                    (-(zero + shift) * t).exp()
                } else {
                    df
                }
            })
            .collect();

        Self::new(
            self.reference_date,
            self.pillar_times.clone(),
            dfs,
            self.interpolation,
            format!("{}_shifted_{shift_bp}bp", self.name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> Date {
        Date::parse("2025-08-08").unwrap()
    }

    fn sample_curve() -> DiscountCurve {
        DiscountCurve::new(
            reference(),
            vec![0.25, 1.0, 2.0, 5.0],
            vec![0.99, 0.962, 0.93, 0.845],
            InterpolationMethod::StepForwardContinuous,
            "EUR-OIS",
        )
        .unwrap()
    }

    #[test]
    fn test_df_at_pillars() {
        let curve = sample_curve();
        assert_relative_eq!(curve.df(1.0), 0.962, epsilon = 1e-14);
        assert_relative_eq!(curve.df(5.0), 0.845, epsilon = 1e-14);
    }

    #[test]
    fn test_df_properties() {
        // Positivity, df(0) = 1, weak monotonicity
        let curve = sample_curve();
        assert_relative_eq!(curve.df(0.0), 1.0);
        let mut prev = 1.0;
        for i in 0..=60 {
            let t = f64::from(i) * 0.1;
            let df = curve.df(t);
            assert!(df > 0.0);
            assert!(df <= prev + 1e-6, "df({t}) = {df} > {prev}");
            prev = df;
        }
    }

    #[test]
    fn test_zero_rate() {
        let curve = sample_curve();
        let t = 2.0;
        assert_relative_eq!(curve.zero(t), -curve.df(t).ln() / t);
        assert_eq!(curve.zero(0.0), 0.0);
    }

    #[test]
    fn test_df_at_date_uses_act365f() {
        let curve = sample_curve();
        let date = reference().add_days(365);
        assert_relative_eq!(curve.df_at(date), curve.df(1.0), epsilon = 1e-14);
    }

    #[test]
    fn test_validation() {
        let r = reference();
        assert!(matches!(
            DiscountCurve::new(r, vec![], vec![], InterpolationMethod::LinearDf, "X"),
            Err(CurveError::EmptyCurve)
        ));
        assert!(DiscountCurve::new(
            r,
            vec![1.0, 1.0],
            vec![0.9, 0.9],
            InterpolationMethod::LinearDf,
            "X"
        )
        .is_err());
        assert!(DiscountCurve::new(
            r,
            vec![1.0, 2.0],
            vec![0.9, -0.1],
            InterpolationMethod::LinearDf,
            "X"
        )
        .is_err());
    }

    #[test]
    fn test_spot_stub_insertion() {
        let curve = sample_curve();
        let stubbed = curve.with_spot_stub(0.01, 0.9996).unwrap();
        assert_eq!(stubbed.pillar_times().len(), 5);
        assert_relative_eq!(stubbed.df(0.01), 0.9996, epsilon = 1e-12);
        // A stub past the first pillar is ignored
        let ignored = curve.with_spot_stub(0.5, 0.99).unwrap();
        assert_eq!(ignored.pillar_times().len(), 4);
    }

    #[test]
    fn test_parallel_shift() {
        let curve = sample_curve();
        let shifted = curve.shift_parallel(100.0).unwrap();
        // 100bp up means zero rates up by 0.01 at every pillar
        for (&t, &df) in curve.pillar_times().iter().zip(curve.discount_factors()) {
            let z = -df.ln() / t;
            assert_relative_eq!(shifted.zero(t), z + 0.01, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_flat_curve() {
        let curve = DiscountCurve::flat(reference(), 0.03, 30.0, "FLAT").unwrap();
        assert_relative_eq!(curve.df(10.0), (-0.3_f64).exp(), epsilon = 1e-12);
    }
}
