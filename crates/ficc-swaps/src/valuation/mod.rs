//! Dual-curve swap valuation.
//!
//! The pricing pipeline: build the leg schedule, project forwards off
//! the leg's projection curve, discount on the OIS curve (or the
//! projection curve when so specified), and report the PV with a full
//! cashflow breakdown. Par-rate and par-spread solvers sit on top of
//! the same pipeline.

mod discounting;
mod forwards;
mod par_rate;
mod pv;
mod solver;
mod types;

pub use discounting::discount_factor;
pub use forwards::forward_rate;
pub use par_rate::par_rate;
pub use pv::{price_leg, price_swap};
pub use solver::{solve_receive_leg_spread, SpreadSolverConfig};
pub use types::{
    CouponCashflow, CurveSet, Direction, Discounting, LegPv, SwapPv, SwapSpec,
};
