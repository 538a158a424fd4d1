//! # FICC
//!
//! Fixed income analytics covering two asset families:
//!
//! - **Korean Treasury Bonds**: street-convention pricing, YTM
//!   inversion, duration/convexity, par and cash-bond curve
//!   bootstrapping, key-rate deltas, equivalent-YTM mapping, and KTB
//!   futures fair value
//! - **EUR interest-rate swaps**: the dual-curve framework with OIS
//!   discounting and EURIBOR projection curves, schedule generation,
//!   PV decomposition, par rates, and par-spread solving
//!
//! This crate re-exports the workspace members; depend on the
//! individual crates for a smaller footprint.
//!
//! ```rust
//! use ficc::prelude::*;
//!
//! let bond = Ktb::new(
//!     Date::parse("2020-03-10").unwrap(),
//!     Date::parse("2030-03-10").unwrap(),
//!     2.75,
//! )
//! .unwrap();
//! let settlement = Date::parse("2023-09-01").unwrap();
//! let dirty = bond.dirty_price(0.03, settlement).unwrap();
//! let ytm = bond.ytm_from_dirty_price(dirty, settlement, None).unwrap();
//! assert!((ytm - 0.03).abs() < 1e-6);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use ficc_bonds;
pub use ficc_core;
pub use ficc_curves;
pub use ficc_math;
pub use ficc_swaps;

/// Prelude re-exporting the common surface of every member crate.
pub mod prelude {
    pub use ficc_bonds::prelude::*;
    pub use ficc_core::prelude::*;
    pub use ficc_curves::prelude::*;
    pub use ficc_math::prelude::*;
    pub use ficc_swaps::prelude::*;
}
