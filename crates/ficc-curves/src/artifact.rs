//! Canonical serialized curve representation.
//!
//! The artifact is the library's exchange format for curves: reference
//! date, ordered pillars, what the pillar values mean, and how to
//! interpolate them. All floats are decimals, never percent.

use serde::{Deserialize, Serialize};

use ficc_core::types::Date;

use crate::compounding::Compounding;
use crate::discount::DiscountCurve;
use crate::interpolation::InterpolationMethod;
use crate::projection::ProjectionCurve;
use crate::zero::ZeroCurve;

/// What a pillar value represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveValueKind {
    /// Discount factor.
    DiscountFactor,
    /// Zero rate, decimal.
    ZeroRateDecimal,
    /// Par rate, decimal.
    ParRateDecimal,
    /// Pseudo-discount factor of a projection curve.
    PseudoDf,
}

/// One pillar of a serialized curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarPoint {
    /// Tenor in years from the reference date.
    pub tenor_years: f64,
    /// Pillar value per the artifact's `value_kind`.
    pub value: f64,
}

/// A serialized curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveArtifact {
    /// Curve reference date (ISO).
    pub reference_date: Date,
    /// Ordered pillars.
    pub pillars: Vec<PillarPoint>,
    /// Meaning of the pillar values.
    pub value_kind: CurveValueKind,
    /// Compounding for rate-valued pillars.
    pub compounding: Compounding,
    /// Interpolation method name (e.g. `STEP_FORWARD_CONTINUOUS`).
    pub interpolation_method: String,
}

impl CurveArtifact {
    /// Serializes a KTB zero curve.
    #[must_use]
    pub fn from_zero_curve(curve: &ZeroCurve) -> Self {
        Self {
            reference_date: curve.curve_date(),
            pillars: curve
                .nodes()
                .iter()
                .map(|&(t, z)| PillarPoint {
                    tenor_years: t,
                    value: z,
                })
                .collect(),
            value_kind: CurveValueKind::ZeroRateDecimal,
            compounding: curve.compounding(),
            interpolation_method: "LINEAR_ZERO".into(),
        }
    }

    /// Serializes the retained par nodes of a par-bootstrapped curve,
    /// falling back to the zero representation otherwise.
    #[must_use]
    pub fn from_par_nodes(curve: &ZeroCurve) -> Self {
        match curve.par_nodes() {
            Some(par) => Self {
                reference_date: curve.curve_date(),
                pillars: par
                    .iter()
                    .map(|&(t, y)| PillarPoint {
                        tenor_years: t,
                        value: y,
                    })
                    .collect(),
                value_kind: CurveValueKind::ParRateDecimal,
                compounding: curve.compounding(),
                interpolation_method: "LINEAR_ZERO".into(),
            },
            None => Self::from_zero_curve(curve),
        }
    }

    /// Serializes an OIS discount curve.
    #[must_use]
    pub fn from_discount_curve(curve: &DiscountCurve) -> Self {
        Self {
            reference_date: curve.reference_date(),
            pillars: pillar_points(curve.pillar_times(), curve.discount_factors()),
            value_kind: CurveValueKind::DiscountFactor,
            compounding: Compounding::Continuous,
            interpolation_method: curve.interpolation().name().into(),
        }
    }

    /// Serializes an IBOR projection curve.
    #[must_use]
    pub fn from_projection_curve(curve: &ProjectionCurve) -> Self {
        Self {
            reference_date: curve.reference_date(),
            pillars: pillar_points(curve.pillar_times(), curve.pseudo_discount_factors()),
            value_kind: CurveValueKind::PseudoDf,
            compounding: Compounding::Continuous,
            interpolation_method: "STEP_FORWARD_CONTINUOUS".into(),
        }
    }

    /// Rebuilds a discount curve from a discount-factor artifact.
    ///
    /// # Errors
    ///
    /// Returns an error when the artifact is not discount-factor valued,
    /// the interpolation name is unknown, or curve validation fails.
    pub fn to_discount_curve(&self) -> crate::CurveResult<DiscountCurve> {
        if self.value_kind != CurveValueKind::DiscountFactor {
            return Err(crate::CurveError::invalid_data(format!(
                "expected discount_factor pillars, got {:?}",
                self.value_kind
            )));
        }
        let method: InterpolationMethod = self.interpolation_method.parse()?;
        DiscountCurve::new(
            self.reference_date,
            self.pillars.iter().map(|p| p.tenor_years).collect(),
            self.pillars.iter().map(|p| p.value).collect(),
            method,
            "from-artifact",
        )
    }
}

fn pillar_points(times: &[f64], values: &[f64]) -> Vec<PillarPoint> {
    times
        .iter()
        .zip(values)
        .map(|(&t, &v)| PillarPoint {
            tenor_years: t,
            value: v,
        })
        .collect()
}
