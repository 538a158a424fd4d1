//! # FICC Bonds
//!
//! Korean Treasury Bond analytics:
//!
//! - [`Ktb`]: the bond instrument - schedule, cashflows, accrued interest
//! - Pricing: street-convention dirty price with stub-fraction
//!   discounting, Newton YTM inversion, pricing off discount curves,
//!   forward prices
//! - [`risk`]: modified duration, convexity, and key-rate deltas by par
//!   curve re-bootstrap
//! - [`equivalent_ytm`]: YTM-space equivalents of key-rate shifts
//! - [`curve`]: discount factors bootstrapped from cash bond prices
//! - [`futures`]: KTB futures forward yields and basket fair value
//!
//! Rates are decimals internally; the public surface takes coupons and
//! observed yields in percent where the market quotes them that way, and
//! says so in the parameter name.
//!
//! [`Ktb`]: bond::Ktb

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bond;
pub mod curve;
pub mod equivalent_ytm;
pub mod error;
pub mod futures;
pub mod pricing;
pub mod risk;

pub use bond::Ktb;
pub use error::{BondError, BondResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bond::Ktb;
    pub use crate::curve::{bootstrap_discount_nodes, BondQuote};
    pub use crate::equivalent_ytm::{equivalent_ytm_levels, equivalent_ytm_shifts};
    pub use crate::error::{BondError, BondResult};
    pub use crate::futures::{notional_bond_price, FuturesBasket, FuturesEngine, UnderlyingBond};
    pub use crate::risk::{batch_key_rate_delta, key_rate_delta, price_from_par_curve};
}
