//! KTB curve bootstrapping.
//!
//! Two paths produce the KTB term structure:
//!
//! - [`par`]: zero rates from quoted par yields (the standard path used
//!   by [`crate::zero::ZeroCurve::from_par_yields`])
//! - [`nodes`]: grids derived from discount-factor nodes produced by the
//!   cash-bond bootstrap (which itself lives with the bond analytics)

pub mod nodes;
pub mod par;

pub use nodes::{par_curve_from_nodes, zero_grid_from_nodes, DiscountFactorNode};
pub use par::{bootstrap_zero_from_par, reprice_par_quote};
