//! Dual-curve IBOR projection bootstrapping.
//!
//! Builds the pseudo-discount-factor curve for one EURIBOR tenor while
//! discounting every cashflow on the OIS curve. The front stub fixes
//! px(spot) = 1 (money-market convention); deposits pin the short end in
//! closed form; each par swap then solves its maturity pseudo-DF so the
//! floating leg matches the fixed leg PV.

use std::collections::BTreeMap;

use ficc_core::daycounts::{Act365Fixed, DayCount, DayCountConvention};
use ficc_core::types::{Date, Tenor};
use ficc_curves::discount::DiscountCurve;
use ficc_curves::interpolation::InterpolationMethod;
use ficc_curves::projection::ProjectionCurve;
use ficc_curves::CurveError;
use ficc_math::solvers::{bisect, BisectionConfig};

use crate::conventions::{DepositConvention, SwapLegConvention};
use crate::error::{SwapError, SwapResult};
use crate::quotes::{
    annual_payment_dates, maturity_for_tenor, spot_date, InstrumentConvention, Quote,
};
use crate::schedule::{bootstrap_periods, BootstrapPeriod};

/// One solved pillar of the bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct PillarResult {
    /// The quoted tenor.
    pub tenor: Tenor,
    /// Pillar maturity date.
    pub maturity: Date,
    /// ACT/365F time from the curve date.
    pub time: f64,
    /// Solved pseudo-discount factor.
    pub pseudo_df: f64,
    /// Continuously compounded zero equivalent.
    pub zero_rate: f64,
}

/// Output of the IBOR bootstrap.
#[derive(Debug, Clone)]
pub struct IborBuildResult {
    /// The projection curve (step-forward over the solved pillars).
    pub curve: ProjectionCurve,
    /// Per-instrument pillar rows, sorted by maturity.
    pub results: Vec<PillarResult>,
    /// Every floating end date solved along the way (interior points
    /// included), for diagnostics and fixings.
    pub projection_map: Vec<(Date, f64)>,
}

/// Builder for the dual-curve IBOR bootstrap.
pub struct IborCurveBuilder {
    curve_date: Date,
    ois_curve: DiscountCurve,
    front_stub_df: f64,
    quotes: Vec<Quote>,
}

impl IborCurveBuilder {
    /// Creates a builder over an already-built OIS discount curve.
    #[must_use]
    pub fn new(curve_date: Date, ois_curve: DiscountCurve) -> Self {
        Self {
            curve_date,
            ois_curve,
            front_stub_df: 1.0,
            quotes: Vec::new(),
        }
    }

    /// Overrides the front-stub convention px(spot).
    ///
    /// The default 1.0 is the money-market convention; carrying the OIS
    /// DF(curve->spot) instead is a documented alternative.
    #[must_use]
    pub fn with_front_stub_df(mut self, front_stub_df: f64) -> Self {
        self.front_stub_df = front_stub_df;
        self
    }

    /// Adds deposit and swap quotes.
    #[must_use]
    pub fn with_quotes(mut self, quotes: impl IntoIterator<Item = Quote>) -> Self {
        self.quotes.extend(quotes);
        self
    }

    /// Runs the bootstrap.
    ///
    /// Deposits solve first (sorted by maturity), then swaps (sorted by
    /// maturity), each one consuming only earlier pillars.
    ///
    /// # Errors
    ///
    /// Returns an error when no quotes are given, a residual cannot be
    /// bracketed, or a solved pseudo-DF is non-positive; the offending
    /// tenor is named.
    pub fn build(self) -> SwapResult<IborBuildResult> {
        if self.quotes.is_empty() {
            return Err(SwapError::Curve(CurveError::EmptyCurve));
        }

        let mut deposits: Vec<(Tenor, f64, DepositConvention)> = Vec::new();
        let mut swaps: Vec<(Tenor, f64, SwapLegConvention)> = Vec::new();
        let mut index_name = None;
        for quote in &self.quotes {
            match &quote.instrument {
                InstrumentConvention::Deposit(conv) => {
                    index_name.get_or_insert_with(|| conv.reference_rate.index_name());
                    deposits.push((quote.tenor, quote.normalized_rate(), conv.clone()));
                }
                InstrumentConvention::SwapLeg(conv) => {
                    if let Some(rate) = conv.reference_rate {
                        index_name.get_or_insert_with(|| rate.index_name());
                    }
                    swaps.push((quote.tenor, quote.normalized_rate(), conv.clone()));
                }
            }
        }
        let index_name = index_name.unwrap_or("EUR-EURIBOR6M");

        let spot = self.spot(&deposits, &swaps);
        let mut engine = Engine {
            curve_date: self.curve_date,
            spot,
            ois_curve: &self.ois_curve,
            pillars: BTreeMap::from([(spot, self.front_stub_df)]),
            interior: BTreeMap::new(),
            results: Vec::new(),
        };

        let mut resolved_deposits: Vec<(Date, Tenor, f64, DepositConvention)> = deposits
            .into_iter()
            .map(|(tenor, rate, conv)| {
                let maturity = maturity_for_tenor(
                    self.curve_date,
                    tenor,
                    &conv.calendar,
                    conv.settlement_lag_days,
                    conv.business_day_adjustment,
                )?;
                Ok((maturity, tenor, rate, conv))
            })
            .collect::<SwapResult<_>>()?;
        resolved_deposits.sort_by_key(|&(maturity, ..)| maturity);
        for (maturity, tenor, rate, convention) in &resolved_deposits {
            engine.bootstrap_deposit(*tenor, *rate, *maturity, convention)?;
        }

        let mut resolved_swaps: Vec<(Date, Tenor, f64, SwapLegConvention)> = swaps
            .into_iter()
            .map(|(tenor, rate, conv)| {
                let maturity = maturity_for_tenor(
                    self.curve_date,
                    tenor,
                    &conv.calendar,
                    conv.fixing_lag_days.max(0),
                    conv.business_day_adjustment,
                )?;
                Ok((maturity, tenor, rate, conv))
            })
            .collect::<SwapResult<_>>()?;
        resolved_swaps.sort_by_key(|&(maturity, ..)| maturity);
        for (maturity, tenor, rate, convention) in &resolved_swaps {
            engine.bootstrap_swap(*tenor, *rate, *maturity, convention)?;
        }

        engine.finish(index_name)
    }

    /// The spot date implied by the quote conventions (2 business days
    /// under the first quote's calendar by default).
    fn spot(
        &self,
        deposits: &[(Tenor, f64, DepositConvention)],
        swaps: &[(Tenor, f64, SwapLegConvention)],
    ) -> Date {
        if let Some((_, _, conv)) = deposits.first() {
            return spot_date(self.curve_date, &conv.calendar, conv.settlement_lag_days);
        }
        if let Some((_, _, conv)) = swaps.first() {
            return spot_date(self.curve_date, &conv.calendar, conv.fixing_lag_days.max(0));
        }
        self.curve_date
    }
}

/// The sequential bootstrap state.
struct Engine<'a> {
    curve_date: Date,
    spot: Date,
    ois_curve: &'a DiscountCurve,
    /// Anchor pillars: spot, deposit maturities, swap maturities.
    pillars: BTreeMap<Date, f64>,
    /// Every solved floating end date (pillars included).
    interior: BTreeMap<Date, f64>,
    results: Vec<PillarResult>,
}

impl Engine<'_> {
    fn time(&self, date: Date) -> f64 {
        Act365Fixed.year_fraction(self.curve_date, date)
    }

    fn ois_df(&self, date: Date) -> f64 {
        self.ois_curve.df(self.time(date))
    }

    fn bootstrap_deposit(
        &mut self,
        tenor: Tenor,
        rate: f64,
        maturity: Date,
        convention: &DepositConvention,
    ) -> SwapResult<()> {
        let alpha = convention
            .day_count
            .to_day_count()
            .year_fraction(self.spot, maturity);

        let front_stub = self.pillars[&self.spot];
        let px = front_stub / (1.0 + rate * alpha);
        if px <= 0.0 {
            return Err(SwapError::Curve(CurveError::NonPositiveDiscount {
                instrument: tenor.to_string(),
                value: px,
            }));
        }

        self.push_pillar(tenor, maturity, px);
        Ok(())
    }

    fn bootstrap_swap(
        &mut self,
        tenor: Tenor,
        rate: f64,
        maturity: Date,
        convention: &SwapLegConvention,
    ) -> SwapResult<()> {
        let fixed_pv = self.fixed_leg_pv(tenor, rate, convention)?;
        let periods = bootstrap_periods(self.spot, maturity, convention)?;
        if periods.is_empty() {
            return Err(SwapError::schedule(
                tenor.to_string(),
                "floating schedule has no usable periods",
            ));
        }
        let final_end = periods.last().expect("non-empty").accrual_end;

        let prev_anchor = self
            .pillars
            .range(..final_end)
            .next_back()
            .map(|(&d, &px)| (d, px))
            .ok_or_else(|| {
                SwapError::invalid_input(format!(
                    "no anchor pillar available before {final_end} for {tenor}"
                ))
            })?;
        let t_prev = self.time(prev_anchor.0);
        let t_final = self.time(final_end);
        let px_prev = prev_anchor.1;

        let residual = |px_candidate: f64| {
            let pv_float: f64 = periods
                .iter()
                .map(|p| {
                    let px_start =
                        self.project(p.accrual_start, px_candidate, prev_anchor.0, t_prev, t_final, px_prev);
                    let px_end =
                        self.project(p.accrual_end, px_candidate, prev_anchor.0, t_prev, t_final, px_prev);
                    let forward = (px_start / px_end - 1.0) / p.year_fraction;
                    p.year_fraction * forward * self.ois_df(p.accrual_end)
                })
                .sum();
            fixed_pv - pv_float
        };

        // Adaptive bracket admitting negative-rate pseudo-DFs above 1
        let mut lower = (px_prev * 0.1).min(0.01);
        let mut upper = (px_prev * 1.5).max(1.5);
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
                instrument: tenor.to_string(),
                lo: lower,
                hi: upper,
                f_lo: res_lower,
                f_hi: res_upper,
            }));
        }

        let px_end = bisect(&residual, lower, upper, &BisectionConfig::new(1e-14, 100))
            .map(|r| r.root)
            .map_err(|e| SwapError::numerical(tenor.to_string(), e))?;
        if px_end <= 0.0 {
            return Err(SwapError::Curve(CurveError::NonPositiveDiscount {
                instrument: tenor.to_string(),
                value: px_end,
            }));
        }

        // Write every intermediate floating end into the interior map;
        // only the maturity becomes an anchor pillar
        for p in &periods {
            let px = self.project(p.accrual_end, px_end, prev_anchor.0, t_prev, t_final, px_prev);
            self.interior.insert(p.accrual_end, px);
        }
        self.push_pillar(tenor, final_end, px_end);
        Ok(())
    }

    /// Fixed leg PV per unit notional: annual 30E/360 accruals against
    /// OIS discount factors.
    fn fixed_leg_pv(
        &self,
        tenor: Tenor,
        rate: f64,
        convention: &SwapLegConvention,
    ) -> SwapResult<f64> {
        let dates = annual_payment_dates(
            self.curve_date,
            tenor,
            &convention.calendar,
            convention.fixing_lag_days.max(0),
            convention.business_day_adjustment,
        )?;
        let fixed_dc = DayCountConvention::Thirty360E.to_day_count();
        Ok(dates
            .windows(2)
            .map(|w| rate * fixed_dc.year_fraction(w[0], w[1]) * self.ois_df(w[1]))
            .sum())
    }

    /// Pseudo-DF at a date during the solve of a candidate pillar.
    fn project(
        &self,
        date: Date,
        px_candidate: f64,
        prev_anchor_date: Date,
        t_prev: f64,
        t_final: f64,
        px_prev: f64,
    ) -> f64 {
        if date <= prev_anchor_date {
            if let Some(&px) = self.pillars.get(&date) {
                return px;
            }
        }

        let t = self.time(date);
        if t <= t_prev {
            return self.interpolate_pillars(t);
        }
        if t >= t_final {
            return px_candidate;
        }

        // Step-forward between the previous anchor and the candidate
        let forward = (px_prev.ln() - px_candidate.ln()) / (t_final - t_prev);
        px_prev * (-forward * (t - t_prev)).exp()
    }

    /// Step-forward interpolation over the existing pillars, flat
    /// outside.
    fn interpolate_pillars(&self, t: f64) -> f64 {
        let entries: Vec<(f64, f64)> = self
            .pillars
            .iter()
            .map(|(&d, &px)| (self.time(d), px))
            .collect();

        if t <= entries[0].0 {
            return entries[0].1;
        }
        let last = entries[entries.len() - 1];
        if t >= last.0 {
            return last.1;
        }
        for w in entries.windows(2) {
            let (t1, px1) = w[0];
            let (t2, px2) = w[1];
            if t1 <= t && t <= t2 {
                let forward = (px1 / px2).ln() / (t2 - t1);
                return px1 * (-forward * (t - t1)).exp();
            }
        }
        last.1
    }

    fn push_pillar(&mut self, tenor: Tenor, maturity: Date, px: f64) {
        let time = self.time(maturity);
        let zero_rate = if time > 0.0 { -px.ln() / time } else { 0.0 };
        self.pillars.insert(maturity, px);
        self.interior.insert(maturity, px);
        self.results.push(PillarResult {
            tenor,
            maturity,
            time,
            pseudo_df: px,
            zero_rate,
        });
        log::debug!("ibor pillar {tenor}: maturity={maturity} px={px}");
    }

    fn finish(self, index_name: &str) -> SwapResult<IborBuildResult> {
        let times: Vec<f64> = self.pillars.keys().map(|&d| self.time(d)).collect();
        let pxs: Vec<f64> = self.pillars.values().copied().collect();

        let curve = ProjectionCurve::new(
            self.curve_date,
            index_name,
            times,
            pxs,
            InterpolationMethod::StepForwardContinuous,
        )?;

        let mut results = self.results;
        results.sort_by_key(|r| r.maturity);

        Ok(IborBuildResult {
            curve,
            results,
            projection_map: self.interior.into_iter().collect(),
        })
    }
}

/// Par rate implied by a built projection curve for one swap quote,
/// used for round-trip validation.
///
/// # Errors
///
/// Propagates date arithmetic errors.
pub fn implied_swap_rate(
    curve_date: Date,
    projection: &ProjectionCurve,
    ois_curve: &DiscountCurve,
    tenor: Tenor,
    convention: &SwapLegConvention,
) -> SwapResult<f64> {
    let time = |d: Date| Act365Fixed.year_fraction(curve_date, d);
    let spot = spot_date(
        curve_date,
        &convention.calendar,
        convention.fixing_lag_days.max(0),
    );
    let maturity = maturity_for_tenor(
        curve_date,
        tenor,
        &convention.calendar,
        convention.fixing_lag_days.max(0),
        convention.business_day_adjustment,
    )?;

    let float_pv: f64 = bootstrap_periods(spot, maturity, convention)?
        .iter()
        .map(|p: &BootstrapPeriod| {
            let forward =
                (projection.px(time(p.accrual_start)) / projection.px(time(p.accrual_end)) - 1.0)
                    / p.year_fraction;
            p.year_fraction * forward * ois_curve.df(time(p.accrual_end))
        })
        .sum();

    let fixed_dc = DayCountConvention::Thirty360E.to_day_count();
    let annuity: f64 = annual_payment_dates(
        curve_date,
        tenor,
        &convention.calendar,
        convention.fixing_lag_days.max(0),
        convention.business_day_adjustment,
    )?
    .windows(2)
    .map(|w| fixed_dc.year_fraction(w[0], w[1]) * ois_curve.df(time(w[1])))
    .sum();

    Ok(float_pv / annuity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{euribor_6m_deposit, euribor_6m_floating};
    use crate::ois::{OisBootstrapper, OisQuote};
    use approx::assert_relative_eq;
    use ficc_core::calendars::{Calendar, WeekendCalendar};
    use std::sync::Arc;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn t(s: &str) -> Tenor {
        s.parse().unwrap()
    }

    fn cal() -> Arc<dyn Calendar> {
        Arc::new(WeekendCalendar)
    }

    fn ois_curve(curve_date: Date) -> DiscountCurve {
        let quotes: Vec<OisQuote> = [
            ("1W", 3.80),
            ("1M", 3.82),
            ("3M", 3.85),
            ("6M", 3.87),
            ("1Y", 3.80),
            ("2Y", 3.50),
            ("5Y", 3.20),
            ("10Y", 3.10),
            ("30Y", 3.00),
        ]
        .iter()
        .map(|&(tenor, rate)| OisQuote::new(tenor.parse().unwrap(), rate))
        .collect();
        OisBootstrapper::new(curve_date, cal())
            .bootstrap(&quotes)
            .unwrap()
    }

    fn euribor_quotes() -> Vec<Quote> {
        let mut quotes = vec![Quote::deposit(t("6M"), 3.92, euribor_6m_deposit(cal()))];
        for &(tenor, rate) in &[
            ("1Y", 3.88),
            ("2Y", 3.60),
            ("3Y", 3.45),
            ("5Y", 3.30),
            ("7Y", 3.25),
            ("10Y", 3.20),
            ("15Y", 3.15),
            ("20Y", 3.12),
            ("30Y", 3.10),
        ] {
            quotes.push(Quote::swap(t(tenor), rate, euribor_6m_floating(cal())));
        }
        quotes
    }

    #[test]
    fn test_pillar_count() {
        // Pillar layout: spot + deposit + one pillar per swap
        let curve_date = d("2025-08-08");
        let result = IborCurveBuilder::new(curve_date, ois_curve(curve_date))
            .with_quotes(euribor_quotes())
            .build()
            .unwrap();
        assert_eq!(result.curve.pillar_times().len(), 1 + 1 + 9);
    }

    #[test]
    fn test_front_stub_is_one() {
        let curve_date = d("2025-08-08");
        let result = IborCurveBuilder::new(curve_date, ois_curve(curve_date))
            .with_quotes(euribor_quotes())
            .build()
            .unwrap();
        // First pillar is spot at px = 1
        assert_relative_eq!(result.curve.pseudo_discount_factors()[0], 1.0);
        // And everything at or before spot projects to 1
        assert_relative_eq!(result.curve.px(0.0), 1.0);
    }

    #[test]
    fn test_swap_quotes_reprice() {
        // Every swap quote must reprice off the built
        // projection + OIS discounting
        let curve_date = d("2025-08-08");
        let ois = ois_curve(curve_date);
        let result = IborCurveBuilder::new(curve_date, ois.clone())
            .with_quotes(euribor_quotes())
            .build()
            .unwrap();

        let convention = euribor_6m_floating(cal());
        for &(tenor, rate) in &[
            ("1Y", 3.88),
            ("2Y", 3.60),
            ("5Y", 3.30),
            ("10Y", 3.20),
            ("30Y", 3.10),
        ] {
            let implied =
                implied_swap_rate(curve_date, &result.curve, &ois, t(tenor), &convention)
                    .unwrap();
            assert_relative_eq!(implied, rate / 100.0, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_deposit_pins_short_end() {
        let curve_date = d("2025-08-08");
        let ois = ois_curve(curve_date);
        let result = IborCurveBuilder::new(curve_date, ois)
            .with_quotes(euribor_quotes())
            .build()
            .unwrap();

        // Second pillar is the deposit: px = 1 / (1 + r alpha)
        let deposit_row = &result.results[0];
        assert_eq!(deposit_row.tenor, t("6M"));
        let spot = spot_date(curve_date, &cal(), 2);
        let alpha = DayCountConvention::Act360.year_fraction(spot, deposit_row.maturity);
        assert_relative_eq!(
            deposit_row.pseudo_df,
            1.0 / (1.0 + 0.0392 * alpha),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_projection_map_covers_interior_dates() {
        let curve_date = d("2025-08-08");
        let result = IborCurveBuilder::new(curve_date, ois_curve(curve_date))
            .with_quotes(euribor_quotes())
            .build()
            .unwrap();

        // Semiannual ends through 30Y, minus pillar overlaps: strictly
        // more entries than pillars
        assert!(result.projection_map.len() > result.curve.pillar_times().len());
        // Interior values are positive and broadly decreasing
        for w in result.projection_map.windows(2) {
            assert!(w[1].1 > 0.0);
            assert!(w[1].1 < w[0].1 + 1e-6);
        }
    }

    #[test]
    fn test_zero_rates_follow_quotes() {
        let curve_date = d("2025-08-08");
        let result = IborCurveBuilder::new(curve_date, ois_curve(curve_date))
            .with_quotes(euribor_quotes())
            .build()
            .unwrap();

        // Long-end pseudo-zero sits near the 30Y quote level
        let last = result.results.last().unwrap();
        assert_relative_eq!(last.zero_rate, 0.031, max_relative = 0.05);
    }

    #[test]
    fn test_empty_quotes_rejected() {
        let curve_date = d("2025-08-08");
        assert!(IborCurveBuilder::new(curve_date, ois_curve(curve_date))
            .build()
            .is_err());
    }
}
