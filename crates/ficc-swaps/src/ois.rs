//! OIS discount-curve bootstrapping.
//!
//! Builds the piecewise discount curve off par OIS quotes. Tenors of at
//! most a year are single-coupon instruments with a closed-form
//! discount factor; longer tenors solve the annual-coupon par condition
//!
//! ```text
//! rate * sum alpha_k * DF(d_k) = 1 - DF(maturity)
//! ```
//!
//! by bisection, consuming only already-solved earlier pillars. The
//! bracket admits discount factors above 1 so deeply negative rate
//! environments still solve.

use std::sync::Arc;

use ficc_core::calendars::{BusinessDayAdjustment, Calendar};
use ficc_core::daycounts::{Act365Fixed, DayCount, DayCountConvention};
use ficc_core::types::{Date, Tenor};
use ficc_curves::discount::DiscountCurve;
use ficc_curves::interpolation::InterpolationMethod;
use ficc_curves::CurveError;
use ficc_math::solvers::{bisect, BisectionConfig};

use crate::error::{SwapError, SwapResult};
use crate::quotes::{annual_payment_dates, maturity_for_tenor, normalize_rate, spot_date};

/// A par OIS quote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OisQuote {
    /// The quoted tenor.
    pub tenor: Tenor,
    /// The par rate, percent or decimal.
    pub rate: f64,
}

impl OisQuote {
    /// Creates a quote.
    #[must_use]
    pub fn new(tenor: Tenor, rate: f64) -> Self {
        Self { tenor, rate }
    }
}

/// Bootstraps an OIS discount curve from par quotes.
pub struct OisBootstrapper {
    reference_date: Date,
    calendar: Arc<dyn Calendar>,
    spot_lag: i32,
    fixed_day_count: DayCountConvention,
    adjustment: BusinessDayAdjustment,
    interpolation: InterpolationMethod,
    insert_spot_stub: bool,
    curve_name: String,
}

impl OisBootstrapper {
    /// Creates a bootstrapper with EUR OIS defaults: 2-day spot lag,
    /// ACT/360 fixed accruals, modified following, step-forward curve.
    #[must_use]
    pub fn new(reference_date: Date, calendar: Arc<dyn Calendar>) -> Self {
        Self {
            reference_date,
            calendar,
            spot_lag: 2,
            fixed_day_count: DayCountConvention::Act360,
            adjustment: BusinessDayAdjustment::ModifiedFollowing,
            interpolation: InterpolationMethod::StepForwardContinuous,
            insert_spot_stub: false,
            curve_name: "EUR-OIS".into(),
        }
    }

    /// Overrides the curve interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Inserts a near-spot pillar from the shortest quote's rate.
    #[must_use]
    pub fn with_spot_stub(mut self) -> Self {
        self.insert_spot_stub = true;
        self
    }

    /// Overrides the spot lag.
    #[must_use]
    pub fn with_spot_lag(mut self, spot_lag: i32) -> Self {
        self.spot_lag = spot_lag;
        self
    }

    /// The spot date the bootstrap discounts from.
    #[must_use]
    pub fn spot(&self) -> Date {
        spot_date(self.reference_date, &self.calendar, self.spot_lag)
    }

    /// Bootstraps the discount curve.
    ///
    /// # Errors
    ///
    /// Returns an error when the quote set is empty, a residual cannot
    /// be bracketed, or a solved discount factor is non-positive; the
    /// offending tenor is named.
    pub fn bootstrap(&self, quotes: &[OisQuote]) -> SwapResult<DiscountCurve> {
        if quotes.is_empty() {
            return Err(SwapError::Curve(CurveError::EmptyCurve));
        }
        let spot = self.spot();
        let fixed_dc = self.fixed_day_count.to_day_count();

        // Resolve maturities and keep the bootstrap order by date
        let mut resolved: Vec<(OisQuote, Date)> = quotes
            .iter()
            .map(|q| {
                let maturity = maturity_for_tenor(
                    self.reference_date,
                    q.tenor,
                    &self.calendar,
                    self.spot_lag,
                    self.adjustment,
                )?;
                Ok((*q, maturity))
            })
            .collect::<SwapResult<_>>()?;
        resolved.sort_by_key(|&(_, maturity)| maturity);

        let mut pillars: Vec<(Date, f64)> = Vec::with_capacity(resolved.len());

        for (quote, maturity) in &resolved {
            let rate = normalize_rate(quote.rate);
            let df = if quote.tenor.is_short() {
                // Single-coupon par condition in exponential form
                let alpha = fixed_dc.year_fraction(spot, *maturity);
                (-rate * alpha).exp()
            } else {
                self.solve_long_tenor(quote, *maturity, rate, spot, &*fixed_dc, &pillars)?
            };

            if df <= 0.0 {
                return Err(SwapError::Curve(CurveError::NonPositiveDiscount {
                    instrument: quote.tenor.to_string(),
                    value: df,
                }));
            }
            log::debug!("ois pillar {}: maturity={maturity} df={df}", quote.tenor);
            pillars.push((*maturity, df));
        }

        let times: Vec<f64> = pillars
            .iter()
            .map(|&(date, _)| Act365Fixed.year_fraction(self.reference_date, date))
            .collect();
        let dfs: Vec<f64> = pillars.iter().map(|&(_, df)| df).collect();

        let curve = DiscountCurve::new(
            self.reference_date,
            times,
            dfs,
            self.interpolation,
            self.curve_name.clone(),
        )?;

        if self.insert_spot_stub {
            // Carry the shortest quote's rate over the trade-to-spot stub
            let (short_quote, _) = &resolved[0];
            let stub_alpha = fixed_dc.year_fraction(self.reference_date, spot);
            let stub_time = Act365Fixed.year_fraction(self.reference_date, spot);
            let stub_df = (-normalize_rate(short_quote.rate) * stub_alpha).exp();
            return Ok(curve.with_spot_stub(stub_time, stub_df)?);
        }

        Ok(curve)
    }

    /// Solves one long-tenor pillar by bisection on the par residual.
    fn solve_long_tenor(
        &self,
        quote: &OisQuote,
        maturity: Date,
        rate: f64,
        spot: Date,
        fixed_dc: &dyn DayCount,
        pillars: &[(Date, f64)],
    ) -> SwapResult<f64> {
        let payment_dates = annual_payment_dates(
            self.reference_date,
            quote.tenor,
            &self.calendar,
            self.spot_lag,
            self.adjustment,
        )?;

        let accruals: Vec<(Date, f64)> = payment_dates
            .windows(2)
            .map(|w| (w[1], fixed_dc.year_fraction(w[0], w[1])))
            .collect();

        let residual = |df_candidate: f64| {
            let fixed_pv: f64 = accruals
                .iter()
                .map(|&(pay_date, alpha)| {
                    let df = self.interpolate_df(pay_date, maturity, df_candidate, spot, pillars);
                    rate * alpha * df
                })
                .sum();
            let floating_pv = 1.0 - df_candidate;
            fixed_pv - floating_pv
        };

        // Bracket wide enough for negative rates (DF above 1)
        let mut lower: f64 = 0.01;
        let mut upper: f64 = 1.5;
        let mut res_lower = residual(lower);
        let mut res_upper = residual(upper);
        let mut attempts = 0;
        while res_lower * res_upper > 0.0 && attempts < 20 {
            if res_lower.abs() < res_upper.abs() {
                lower *= 0.5;
                res_lower = residual(lower);
            } else {
                upper *= 1.2;
                res_upper = residual(upper);
            }
            attempts += 1;
        }
        if res_lower * res_upper > 0.0 {
            return Err(SwapError::Curve(CurveError::BracketingFailed {
                instrument: quote.tenor.to_string(),
                lo: lower,
                hi: upper,
                f_lo: res_lower,
                f_hi: res_upper,
            }));
        }

        bisect(&residual, lower, upper, &BisectionConfig::new(1e-12, 100))
            .map(|r| r.root)
            .map_err(|e| SwapError::numerical(quote.tenor.to_string(), e))
    }

    /// Discount factor during the solve: 1 at or before spot, the
    /// candidate at the new maturity, log-linear on ACT/365F time
    /// between solved pillars, and the spot-anchored forward below the
    /// first pillar.
    fn interpolate_df(
        &self,
        date: Date,
        candidate_maturity: Date,
        df_candidate: f64,
        spot: Date,
        pillars: &[(Date, f64)],
    ) -> f64 {
        if date <= spot {
            return 1.0;
        }
        if date == candidate_maturity {
            return df_candidate;
        }
        if let Some(&(_, df)) = pillars.iter().find(|&&(d, _)| d == date) {
            return df;
        }

        let time = |d: Date| Act365Fixed.year_fraction(self.reference_date, d);
        let t = time(date);

        // Work on the pillar set extended by the candidate
        let first = pillars.first().map_or((candidate_maturity, df_candidate), |&p| p);
        if date < first.0 {
            let t_spot = time(spot);
            let t1 = time(first.0);
            if t1 <= t_spot {
                return 1.0;
            }
            let forward = -first.1.ln() / (t1 - t_spot);
            return (-forward * (t - t_spot)).exp();
        }

        // Find the bracketing pair among pillars plus the candidate
        let mut below = first;
        for &(d, df) in pillars {
            if d <= date {
                below = (d, df);
            }
        }
        let mut above = (candidate_maturity, df_candidate);
        for &(d, df) in pillars.iter().rev() {
            if d >= date {
                above = (d, df);
            }
        }

        let (t1, df1) = (time(below.0), below.1);
        let (t2, df2) = (time(above.0), above.1);
        if (t2 - t1).abs() < 1e-10 {
            return df1;
        }
        let forward = (df1 / df2).ln() / (t2 - t1);
        df1 * (-forward * (t - t1)).exp()
    }
}

/// Par rate implied by a bootstrapped curve for one quote, used for
/// round-trip validation.
///
/// Short tenors invert the exponential single-coupon form; longer
/// tenors rebuild the annual schedule and return
/// `(1 - DF(maturity)) / sum alpha_k DF(d_k)`.
///
/// # Errors
///
/// Propagates date arithmetic errors.
pub fn implied_par_rate(
    bootstrapper: &OisBootstrapper,
    curve: &DiscountCurve,
    tenor: Tenor,
) -> SwapResult<f64> {
    let spot = bootstrapper.spot();
    let fixed_dc = bootstrapper.fixed_day_count.to_day_count();
    let maturity = maturity_for_tenor(
        bootstrapper.reference_date,
        tenor,
        &bootstrapper.calendar,
        bootstrapper.spot_lag,
        bootstrapper.adjustment,
    )?;

    if tenor.is_short() {
        let alpha = fixed_dc.year_fraction(spot, maturity);
        return Ok(-curve.df_at(maturity).ln() / alpha);
    }

    let payment_dates = annual_payment_dates(
        bootstrapper.reference_date,
        tenor,
        &bootstrapper.calendar,
        bootstrapper.spot_lag,
        bootstrapper.adjustment,
    )?;
    let annuity: f64 = payment_dates
        .windows(2)
        .map(|w| fixed_dc.year_fraction(w[0], w[1]) * curve.df_at(w[1]))
        .sum();
    Ok((1.0 - curve.df_at(maturity)) / annuity)
}
