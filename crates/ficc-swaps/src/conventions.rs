//! Swap leg and deposit conventions.
//!
//! Conventions are immutable values assembled at configuration time;
//! the calendar capability is injected and shared read-only. The
//! standard EUR set is provided as constructor functions.

use std::sync::Arc;

use ficc_core::calendars::{BusinessDayAdjustment, Calendar};
use ficc_core::daycounts::DayCountConvention;
use ficc_core::types::Frequency;

/// Fixed or floating leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegType {
    /// Pays a fixed rate.
    Fixed,
    /// Pays a floating index.
    Floating,
}

/// When a floating rate resets relative to its accrual period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetPosition {
    /// EURIBOR-style: reset at the period start.
    InAdvance,
    /// Overnight-style: reset at the period end.
    InArrears,
}

/// The floating reference rates this library projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceRate {
    /// 3-month EURIBOR.
    Euribor3M,
    /// 6-month EURIBOR.
    Euribor6M,
    /// The euro short-term rate.
    Estr,
}

impl ReferenceRate {
    /// Index name used for curve lookup and reporting.
    #[must_use]
    pub fn index_name(&self) -> &'static str {
        match self {
            ReferenceRate::Euribor3M => "EUR-EURIBOR3M",
            ReferenceRate::Euribor6M => "EUR-EURIBOR6M",
            ReferenceRate::Estr => "EUR-ESTR",
        }
    }
}

/// Schedule roll conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollConvention {
    /// Forward generation from the effective date.
    None,
    /// Backward generation anchored to the maturity day-of-month with
    /// the end-of-month rule (SWPM-style).
    BackwardEom,
}

/// Stub classification for schedule generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubType {
    /// Dates must align exactly; misalignment is an error.
    NoStub,
    /// Short irregular first period.
    ShortInitial,
    /// Long irregular first period.
    LongInitial,
    /// Short irregular last period.
    ShortFinal,
    /// Long irregular last period.
    LongFinal,
}

/// Convention for one swap leg.
#[derive(Clone)]
pub struct SwapLegConvention {
    /// Fixed or floating.
    pub leg_type: LegType,
    /// The projected index; `None` for fixed legs.
    pub reference_rate: Option<ReferenceRate>,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Payment frequency.
    pub pay_frequency: Frequency,
    /// Reset frequency; `None` for fixed legs.
    pub reset_frequency: Option<Frequency>,
    /// Business days from fixing to reset.
    pub fixing_lag_days: i32,
    /// Business days from accrual end to payment.
    pub pay_delay_days: i32,
    /// Adjustment applied to accrual dates.
    pub business_day_adjustment: BusinessDayAdjustment,
    /// Schedule roll convention.
    pub roll_convention: RollConvention,
    /// Reset timing; `None` for fixed legs.
    pub reset_position: Option<ResetPosition>,
    /// Overnight rate cutoff days (in-arrears legs).
    pub rate_cutoff_days: i32,
    /// The business day calendar.
    pub calendar: Arc<dyn Calendar>,
}

impl std::fmt::Debug for SwapLegConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapLegConvention")
            .field("leg_type", &self.leg_type)
            .field("reference_rate", &self.reference_rate)
            .field("day_count", &self.day_count)
            .field("pay_frequency", &self.pay_frequency)
            .field("reset_frequency", &self.reset_frequency)
            .field("fixing_lag_days", &self.fixing_lag_days)
            .field("pay_delay_days", &self.pay_delay_days)
            .field("business_day_adjustment", &self.business_day_adjustment)
            .field("roll_convention", &self.roll_convention)
            .field("reset_position", &self.reset_position)
            .field("rate_cutoff_days", &self.rate_cutoff_days)
            .field("calendar", &self.calendar.name())
            .finish()
    }
}

impl SwapLegConvention {
    /// A stable identifier for reports.
    #[must_use]
    pub fn id(&self) -> String {
        match (self.leg_type, self.reference_rate) {
            (LegType::Fixed, _) => format!("FIXED-{:?}", self.pay_frequency).to_uppercase(),
            (LegType::Floating, Some(rate)) => {
                format!("{}-{:?}", rate.index_name(), self.pay_frequency).to_uppercase()
            }
            (LegType::Floating, None) => "FLOATING".into(),
        }
    }
}

/// Convention for a money-market deposit.
#[derive(Clone)]
pub struct DepositConvention {
    /// The deposited index.
    pub reference_rate: ReferenceRate,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Business days from trade to settlement.
    pub settlement_lag_days: i32,
    /// Adjustment applied to the maturity.
    pub business_day_adjustment: BusinessDayAdjustment,
    /// The business day calendar.
    pub calendar: Arc<dyn Calendar>,
}

impl std::fmt::Debug for DepositConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositConvention")
            .field("reference_rate", &self.reference_rate)
            .field("day_count", &self.day_count)
            .field("settlement_lag_days", &self.settlement_lag_days)
            .field("business_day_adjustment", &self.business_day_adjustment)
            .field("calendar", &self.calendar.name())
            .finish()
    }
}

/// EURIBOR 3M floating leg: quarterly, ACT/360, 2-day fixing lag.
#[must_use]
pub fn euribor_3m_floating(calendar: Arc<dyn Calendar>) -> SwapLegConvention {
    SwapLegConvention {
        leg_type: LegType::Floating,
        reference_rate: Some(ReferenceRate::Euribor3M),
        day_count: DayCountConvention::Act360,
        pay_frequency: Frequency::Quarterly,
        reset_frequency: Some(Frequency::Quarterly),
        fixing_lag_days: 2,
        pay_delay_days: 0,
        business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
        roll_convention: RollConvention::BackwardEom,
        reset_position: Some(ResetPosition::InAdvance),
        rate_cutoff_days: 0,
        calendar,
    }
}

/// EURIBOR 6M floating leg: semiannual, ACT/360, 2-day fixing lag.
#[must_use]
pub fn euribor_6m_floating(calendar: Arc<dyn Calendar>) -> SwapLegConvention {
    SwapLegConvention {
        leg_type: LegType::Floating,
        reference_rate: Some(ReferenceRate::Euribor6M),
        day_count: DayCountConvention::Act360,
        pay_frequency: Frequency::SemiAnnual,
        reset_frequency: Some(Frequency::SemiAnnual),
        fixing_lag_days: 2,
        pay_delay_days: 0,
        business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
        roll_convention: RollConvention::BackwardEom,
        reset_position: Some(ResetPosition::InAdvance),
        rate_cutoff_days: 0,
        calendar,
    }
}

/// ESTR floating leg: annual payments, daily resets in arrears, ACT/365F.
#[must_use]
pub fn estr_floating(calendar: Arc<dyn Calendar>) -> SwapLegConvention {
    SwapLegConvention {
        leg_type: LegType::Floating,
        reference_rate: Some(ReferenceRate::Estr),
        day_count: DayCountConvention::Act365Fixed,
        pay_frequency: Frequency::Annual,
        reset_frequency: Some(Frequency::Daily),
        fixing_lag_days: 0,
        pay_delay_days: 1,
        business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
        roll_convention: RollConvention::BackwardEom,
        reset_position: Some(ResetPosition::InArrears),
        rate_cutoff_days: 1,
        calendar,
    }
}

/// ESTR fixed leg: annual, ACT/360.
#[must_use]
pub fn estr_fixed(calendar: Arc<dyn Calendar>) -> SwapLegConvention {
    SwapLegConvention {
        leg_type: LegType::Fixed,
        reference_rate: Some(ReferenceRate::Estr),
        day_count: DayCountConvention::Act360,
        pay_frequency: Frequency::Annual,
        reset_frequency: None,
        fixing_lag_days: 0,
        pay_delay_days: 1,
        business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
        roll_convention: RollConvention::BackwardEom,
        reset_position: None,
        rate_cutoff_days: 0,
        calendar,
    }
}

/// EUR IRS fixed leg: annual, ACT/360.
#[must_use]
pub fn eur_irs_fixed(calendar: Arc<dyn Calendar>) -> SwapLegConvention {
    SwapLegConvention {
        leg_type: LegType::Fixed,
        reference_rate: None,
        day_count: DayCountConvention::Act360,
        pay_frequency: Frequency::Annual,
        reset_frequency: None,
        fixing_lag_days: 0,
        pay_delay_days: 1,
        business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
        roll_convention: RollConvention::BackwardEom,
        reset_position: None,
        rate_cutoff_days: 0,
        calendar,
    }
}

/// EURIBOR 3M deposit convention.
#[must_use]
pub fn euribor_3m_deposit(calendar: Arc<dyn Calendar>) -> DepositConvention {
    DepositConvention {
        reference_rate: ReferenceRate::Euribor3M,
        day_count: DayCountConvention::Act360,
        settlement_lag_days: 2,
        business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
        calendar,
    }
}

/// EURIBOR 6M deposit convention.
#[must_use]
pub fn euribor_6m_deposit(calendar: Arc<dyn Calendar>) -> DepositConvention {
    DepositConvention {
        reference_rate: ReferenceRate::Euribor6M,
        day_count: DayCountConvention::Act360,
        settlement_lag_days: 2,
        business_day_adjustment: BusinessDayAdjustment::ModifiedFollowing,
        calendar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ficc_core::calendars::WeekendCalendar;

    #[test]
    fn test_standard_conventions() {
        let cal: Arc<dyn Calendar> = Arc::new(WeekendCalendar);
        let e6 = euribor_6m_floating(cal.clone());
        assert_eq!(e6.leg_type, LegType::Floating);
        assert_eq!(e6.reset_frequency, Some(Frequency::SemiAnnual));
        assert_eq!(e6.day_count, DayCountConvention::Act360);

        let fixed = eur_irs_fixed(cal.clone());
        assert_eq!(fixed.leg_type, LegType::Fixed);
        assert!(fixed.reference_rate.is_none());

        let estr = estr_floating(cal);
        assert_eq!(estr.reset_position, Some(ResetPosition::InArrears));
        assert_eq!(estr.rate_cutoff_days, 1);
    }

    #[test]
    fn test_ids_distinguish_legs() {
        let cal: Arc<dyn Calendar> = Arc::new(WeekendCalendar);
        let a = euribor_3m_floating(cal.clone()).id();
        let b = euribor_6m_floating(cal.clone()).id();
        let c = eur_irs_fixed(cal).id();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert!(a.contains("EURIBOR3M"));
    }
}
