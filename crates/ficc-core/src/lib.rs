//! # FICC Core
//!
//! Core primitives for the FICC fixed income analytics library:
//!
//! - **Dates**: [`Date`] newtype with financial month arithmetic
//!   (end-of-month rule, day-of-month preservation) and futures expiry
//!   helpers
//! - **Calendars**: [`Calendar`] capability trait, weekend and
//!   holiday-list calendars, business day adjustment conventions
//! - **Day counts**: ACT/360, ACT/365F, ACT/360A (no-leap), 30E/360,
//!   30U/360, and ACT/ACT ISDA behind the [`DayCount`] trait
//! - **Tenors and frequencies**: the `1W`/`3M`/`10Y` quote grammar and
//!   payment frequencies
//!
//! Everything here is a plain immutable value: calendars and conventions
//! are built once at configuration time and shared read-only across
//! pricing calls.
//!
//! [`Date`]: types::Date
//! [`Calendar`]: calendars::Calendar
//! [`DayCount`]: daycounts::DayCount

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use types::Date;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        futures_termination_dates, third_tuesday, BusinessDayAdjustment, Calendar,
        HolidayCalendar, WeekendCalendar,
    };
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Cashflow, Date, Frequency, Tenor};
}
