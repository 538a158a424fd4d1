//! IBOR projection curve.

use std::sync::Arc;

use ficc_core::daycounts::{Act365Fixed, DayCount};
use ficc_core::types::Date;
use ficc_math::interpolation::Interpolator;

use crate::error::{CurveError, CurveResult};
use crate::interpolation::InterpolationMethod;

/// A pseudo-discount-factor curve for one IBOR index tenor.
///
/// The pseudo-discount factors `px(t)` have no discounting meaning of
/// their own; their ratios produce index forwards,
///
/// ```text
/// F(u, v) = (px(u) / px(v) - 1) / alpha(u, v)
/// ```
///
/// while cashflow discounting stays on the OIS curve (the dual-curve
/// framework).
#[derive(Clone)]
pub struct ProjectionCurve {
    reference_date: Date,
    index_name: String,
    pillar_times: Vec<f64>,
    pseudo_dfs: Vec<f64>,
    interpolation: InterpolationMethod,
    interpolator: Arc<dyn Interpolator>,
}

impl std::fmt::Debug for ProjectionCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectionCurve")
            .field("reference_date", &self.reference_date)
            .field("index_name", &self.index_name)
            .field("pillar_times", &self.pillar_times)
            .field("pseudo_dfs", &self.pseudo_dfs)
            .field("interpolation", &self.interpolation)
            .finish()
    }
}

impl ProjectionCurve {
    /// Creates a new projection curve.
    ///
    /// # Errors
    ///
    /// Returns an error when fewer than 2 pillars are given, lengths
    /// differ, times are not strictly increasing, or any pseudo-discount
    /// factor is non-positive.
    pub fn new(
        reference_date: Date,
        index_name: impl Into<String>,
        pillar_times: Vec<f64>,
        pseudo_dfs: Vec<f64>,
        interpolation: InterpolationMethod,
    ) -> CurveResult<Self> {
        if pillar_times.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        if pillar_times.len() != pseudo_dfs.len() {
            return Err(CurveError::invalid_data(format!(
                "pillar_times ({}) and pseudo_dfs ({}) must have the same length",
                pillar_times.len(),
                pseudo_dfs.len()
            )));
        }
        if pillar_times.len() < 2 {
            return Err(CurveError::invalid_data("need at least 2 pillar points"));
        }
        for (i, &px) in pseudo_dfs.iter().enumerate() {
            if px <= 0.0 {
                return Err(CurveError::NonPositiveDiscount {
                    instrument: format!("projection pillar {i}"),
                    value: px,
                });
            }
        }

        let interpolator: Arc<dyn Interpolator> = interpolation
            .build(pillar_times.clone(), pseudo_dfs.clone())?
            .into();

        Ok(Self {
            reference_date,
            index_name: index_name.into(),
            pillar_times,
            pseudo_dfs,
            interpolation,
            interpolator,
        })
    }

    /// A flat curve at a continuously compounded rate, for tests.
    ///
    /// # Errors
    ///
    /// Propagates construction errors.
    pub fn flat(
        reference_date: Date,
        index_name: impl Into<String>,
        rate: f64,
        max_time: f64,
    ) -> CurveResult<Self> {
        let times: Vec<f64> = (1..=10).map(|i| max_time * f64::from(i) / 10.0).collect();
        let pxs: Vec<f64> = times.iter().map(|&t| (-rate * t).exp()).collect();
        Self::new(
            reference_date,
            index_name,
            times,
            pxs,
            InterpolationMethod::StepForwardContinuous,
        )
    }

    /// The curve reference date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// The index this curve projects (e.g. `EUR-EURIBOR6M`).
    #[must_use]
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// The pillar times in years (ACT/365F from the reference date).
    #[must_use]
    pub fn pillar_times(&self) -> &[f64] {
        &self.pillar_times
    }

    /// The pseudo-discount factors at the pillars.
    #[must_use]
    pub fn pseudo_discount_factors(&self) -> &[f64] {
        &self.pseudo_dfs
    }

    /// Pseudo-discount factor at time `t`; 1 at or before the reference
    /// date.
    #[must_use]
    pub fn px(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        self.interpolator.value_at(t)
    }

    /// Pseudo-discount factor at a date.
    #[must_use]
    pub fn px_at(&self, date: Date) -> f64 {
        self.px(self.time_of(date))
    }

    /// Simple forward over `[u, v]` with accrual fraction `accrual`.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive accrual fraction.
    pub fn forward(&self, u: Date, v: Date, accrual: f64) -> CurveResult<f64> {
        if accrual <= 0.0 {
            return Err(CurveError::invalid_data(format!(
                "forward accrual must be positive, got {accrual}"
            )));
        }
        Ok((self.px_at(u) / self.px_at(v) - 1.0) / accrual)
    }

    /// ACT/365F year fraction from the reference date to `date`.
    #[must_use]
    pub fn time_of(&self, date: Date) -> f64 {
        Act365Fixed.year_fraction(self.reference_date, date)
    }

    /// Returns a curve with all implied zeros shifted by `shift_bp`.
    ///
    /// # Errors
    ///
    /// Propagates construction errors.
    pub fn shift_parallel(&self, shift_bp: f64) -> CurveResult<Self> {
        let shift = shift_bp / 10_000.0;
        let pxs: Vec<f64> = self
            .pillar_times
            .iter()
            .zip(&self.pseudo_dfs)
            .map(|(&t, &px)| {
                if t > 0.0 {
                    let zero = -px.ln() / t;
                    (-(zero + shift) * t).exp()
                } else {
                    px
                }
            })
            .collect();

        Self::new(
            self.reference_date,
            self.index_name.clone(),
            self.pillar_times.clone(),
            pxs,
            self.interpolation,
        )
    }
}
