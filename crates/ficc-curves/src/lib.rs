//! # FICC Curves
//!
//! Curve value objects and KTB curve bootstrapping:
//!
//! - [`ZeroCurve`]: KTB zero curve with continuous / simple / street
//!   compounding, optionally built by bootstrapping par yields
//! - [`DiscountCurve`]: OIS discount curve over ACT/365F pillar times
//! - [`ProjectionCurve`]: IBOR pseudo-discount-factor projection curve
//! - [`bootstrap`]: par-yield and cash-bond bootstrap for the KTB curve
//! - [`artifact`]: the canonical serialized curve representation
//!
//! Curves are immutable once built; bumps produce new curves. They know
//! nothing about the bootstrappers that produce them: the EUR swap
//! bootstrappers live in `ficc-swaps` and hand back these value objects.
//!
//! [`ZeroCurve`]: zero::ZeroCurve
//! [`DiscountCurve`]: discount::DiscountCurve
//! [`ProjectionCurve`]: projection::ProjectionCurve

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod bootstrap;
pub mod compounding;
pub mod discount;
pub mod error;
pub mod interpolation;
pub mod projection;
pub mod zero;

pub use error::{CurveError, CurveResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::artifact::{CurveArtifact, CurveValueKind, PillarPoint};
    pub use crate::bootstrap::{
        bootstrap_zero_from_par, par_curve_from_nodes, reprice_par_quote, zero_grid_from_nodes,
        DiscountFactorNode,
    };
    pub use crate::compounding::Compounding;
    pub use crate::discount::DiscountCurve;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::interpolation::InterpolationMethod;
    pub use crate::projection::ProjectionCurve;
    pub use crate::zero::{CurveKind, ZeroCurve};
}
