//! Forward rate projection for floating coupons.

use ficc_core::types::{Date, Frequency};

use crate::conventions::{LegType, ReferenceRate, SwapLegConvention};
use crate::error::{SwapError, SwapResult};
use crate::quotes::add_tenor_months;
use crate::schedule::Period;

use super::discounting::{projection_curve, ProjectionSource};
use super::types::CurveSet;

/// Projects the forward rate for one floating period.
///
/// EURIBOR coupons reset in advance on a deposit-style forward: the
/// projection quotient runs from the adjusted accrual start to the
/// tenor-aligned end (start plus the index tenor, adjusted), with the
/// accrual fraction of that tenor period. ESTR coupons use the simple
/// forward over the accrual period off the OIS curve.
///
/// # Errors
///
/// Returns an error for fixed legs or when the projection curve is
/// missing.
pub fn forward_rate(
    period: &Period,
    leg: &SwapLegConvention,
    curves: &CurveSet,
    _valuation_date: Date,
) -> SwapResult<f64> {
    if leg.leg_type == LegType::Fixed {
        return Err(SwapError::invalid_input(
            "forward rates do not apply to fixed legs",
        ));
    }

    match projection_curve(leg, curves)? {
        ProjectionSource::Ois(curve) => {
            // ESTR: simple forward over the period itself
            let alpha = leg
                .day_count
                .year_fraction(period.accrual_start_adj, period.accrual_end_adj);
            if alpha <= 0.0 {
                return Err(SwapError::invalid_input(format!(
                    "degenerate accrual in period {}",
                    period.index
                )));
            }
            let df_start = curve.df_at(period.accrual_start_adj);
            let df_end = curve.df_at(period.accrual_end_adj);
            Ok((df_start / df_end - 1.0) / alpha)
        }
        ProjectionSource::Ibor(curve) => {
            let tenor_months = match leg.reset_frequency {
                Some(Frequency::SemiAnnual) => 6,
                Some(Frequency::Quarterly) => 3,
                _ => match leg.reference_rate {
                    Some(ReferenceRate::Euribor3M) => 3,
                    _ => 6,
                },
            };
            let tenor_end = add_tenor_months(
                period.accrual_start_adj,
                tenor_months,
                &leg.calendar,
                leg.business_day_adjustment,
                true,
            )?;
            let alpha_tenor = leg
                .day_count
                .year_fraction(period.accrual_start_adj, tenor_end);
            if alpha_tenor <= 0.0 {
                return Err(SwapError::invalid_input(format!(
                    "degenerate tenor accrual in period {}",
                    period.index
                )));
            }
            let px_start = curve.px_at(period.accrual_start_adj);
            let px_end = curve.px_at(tenor_end);
            Ok((px_start / px_end - 1.0) / alpha_tenor)
        }
    }
}
