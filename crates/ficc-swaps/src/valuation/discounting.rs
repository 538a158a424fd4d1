//! Discount factor selection for swap pricing.

use ficc_core::types::Date;
use ficc_curves::discount::DiscountCurve;
use ficc_curves::projection::ProjectionCurve;

use crate::conventions::{LegType, ReferenceRate, SwapLegConvention};
use crate::error::{SwapError, SwapResult};

use super::types::{CurveSet, Discounting};

/// Discount factor from the valuation date to a payment date.
///
/// Under OIS discounting every leg discounts on the OIS curve; under
/// projection discounting a floating leg discounts on its own
/// projection curve (fixed legs stay on OIS). When the valuation date
/// differs from the curve reference date the factor rebases:
/// `DF(val -> pay) = DF(ref -> pay) / DF(ref -> val)`.
///
/// # Errors
///
/// Returns an error when the leg's projection curve is missing.
pub fn discount_factor(
    payment_date: Date,
    curves: &CurveSet,
    discounting: Discounting,
    leg: &SwapLegConvention,
    valuation_date: Date,
) -> SwapResult<f64> {
    let df = match discounting {
        Discounting::Ois => rebased_discount(&curves.ois_curve, payment_date, valuation_date),
        Discounting::Projection if leg.leg_type == LegType::Floating => {
            match projection_curve(leg, curves)? {
                ProjectionSource::Ois(curve) => {
                    rebased_discount(curve, payment_date, valuation_date)
                }
                ProjectionSource::Ibor(curve) => {
                    let df_pay = curve.px_at(payment_date);
                    if valuation_date == curve.reference_date() {
                        df_pay
                    } else {
                        df_pay / curve.px_at(valuation_date)
                    }
                }
            }
        }
        Discounting::Projection => {
            rebased_discount(&curves.ois_curve, payment_date, valuation_date)
        }
    };
    Ok(df)
}

fn rebased_discount(curve: &DiscountCurve, payment_date: Date, valuation_date: Date) -> f64 {
    let df_pay = curve.df_at(payment_date);
    if valuation_date == curve.reference_date() {
        df_pay
    } else {
        df_pay / curve.df_at(valuation_date)
    }
}

/// The curve a floating leg projects its forwards from.
pub(super) enum ProjectionSource<'a> {
    /// ESTR projects off the OIS curve itself.
    Ois(&'a DiscountCurve),
    /// EURIBOR tenors project off their pseudo-DF curves.
    Ibor(&'a ProjectionCurve),
}

/// Resolves the projection curve for a floating leg convention.
pub(super) fn projection_curve<'a>(
    leg: &SwapLegConvention,
    curves: &'a CurveSet,
) -> SwapResult<ProjectionSource<'a>> {
    match leg.reference_rate {
        Some(ReferenceRate::Estr) => Ok(ProjectionSource::Ois(&curves.ois_curve)),
        Some(ReferenceRate::Euribor3M) => curves
            .euribor3m_curve
            .as_ref()
            .map(ProjectionSource::Ibor)
            .ok_or_else(|| SwapError::missing_curve("EUR-EURIBOR3M")),
        Some(ReferenceRate::Euribor6M) => curves
            .euribor6m_curve
            .as_ref()
            .map(ProjectionSource::Ibor)
            .ok_or_else(|| SwapError::missing_curve("EUR-EURIBOR6M")),
        None => Err(SwapError::invalid_input(
            "floating leg has no reference rate",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventions::{euribor_6m_floating, eur_irs_fixed};
    use approx::assert_relative_eq;
    use ficc_core::calendars::{Calendar, WeekendCalendar};
    use std::sync::Arc;

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn cal() -> Arc<dyn Calendar> {
        Arc::new(WeekendCalendar)
    }

    fn curves() -> CurveSet {
        let reference = d("2025-08-08");
        CurveSet::new(DiscountCurve::flat(reference, 0.03, 40.0, "EUR-OIS").unwrap())
            .with_euribor6m(
                ProjectionCurve::flat(reference, "EUR-EURIBOR6M", 0.033, 40.0).unwrap(),
            )
    }

    #[test]
    fn test_ois_discounting() {
        let curves = curves();
        let df = discount_factor(
            d("2026-08-08"),
            &curves,
            Discounting::Ois,
            &eur_irs_fixed(cal()),
            d("2025-08-08"),
        )
        .unwrap();
        assert_relative_eq!(df, (-0.03_f64).exp(), max_relative = 1e-10);
    }

    #[test]
    fn test_projection_discounting_uses_leg_curve() {
        let curves = curves();
        let leg = euribor_6m_floating(cal());
        let df = discount_factor(
            d("2026-08-08"),
            &curves,
            Discounting::Projection,
            &leg,
            d("2025-08-08"),
        )
        .unwrap();
        assert_relative_eq!(df, (-0.033_f64).exp(), max_relative = 1e-10);
    }

    #[test]
    fn test_valuation_date_rebase() {
        let curves = curves();
        let leg = eur_irs_fixed(cal());
        // Valuing one year after the curve date divides out DF(ref->val)
        let df = discount_factor(
            d("2027-08-08"),
            &curves,
            Discounting::Ois,
            &leg,
            d("2026-08-08"),
        )
        .unwrap();
        let expected = curves.ois_curve.df_at(d("2027-08-08")) / curves.ois_curve.df_at(d("2026-08-08"));
        assert_relative_eq!(df, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_curve_is_typed_error() {
        let reference = d("2025-08-08");
        let bare = CurveSet::new(DiscountCurve::flat(reference, 0.03, 40.0, "EUR-OIS").unwrap());
        let leg = euribor_6m_floating(cal());
        let err = discount_factor(
            d("2026-08-08"),
            &bare,
            Discounting::Projection,
            &leg,
            reference,
        )
        .unwrap_err();
        assert!(matches!(err, SwapError::MissingCurve { .. }));
    }
}
