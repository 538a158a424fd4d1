//! # FICC Swaps
//!
//! EUR interest-rate swaps in the dual-curve framework:
//!
//! - [`conventions`]: leg and deposit conventions (EURIBOR 3M/6M, ESTR)
//! - [`quotes`]: the quote schema and tenor date arithmetic
//! - [`schedule`]: payment schedule generation with rolls and stubs
//! - [`ois`]: the OIS discount-curve bootstrapper
//! - [`ibor`]: the dual-curve IBOR projection bootstrapper
//! - [`valuation`]: schedule + forward projection + discounting + PV,
//!   par rates, and the par-spread solver
//! - [`fixings`]: per-period forward fixings off a projection curve
//!
//! Curves come from and go to `ficc-curves` value objects; nothing here
//! is stateful beyond the bootstrap in progress, and every valuation
//! entry point takes its valuation date explicitly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod conventions;
pub mod error;
pub mod fixings;
pub mod ibor;
pub mod ois;
pub mod quotes;
pub mod schedule;
pub mod valuation;

pub use error::{SwapError, SwapResult};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::conventions::{
        estr_fixed, estr_floating, eur_irs_fixed, euribor_3m_deposit, euribor_3m_floating,
        euribor_6m_deposit, euribor_6m_floating, DepositConvention, LegType, ReferenceRate,
        ResetPosition, RollConvention, StubType, SwapLegConvention,
    };
    pub use crate::error::{SwapError, SwapResult};
    pub use crate::fixings::{forward_fixings, ForwardFixing};
    pub use crate::ibor::{implied_swap_rate, IborBuildResult, IborCurveBuilder, PillarResult};
    pub use crate::ois::{implied_par_rate, OisBootstrapper, OisQuote};
    pub use crate::quotes::{
        annual_payment_dates, maturity_for_tenor, spot_date, InstrumentConvention, Quote,
    };
    pub use crate::schedule::{build_schedule, Period};
    pub use crate::valuation::{
        par_rate, price_swap, solve_receive_leg_spread, CouponCashflow, CurveSet, Direction,
        Discounting, LegPv, SpreadSolverConfig, SwapPv, SwapSpec,
    };
}
