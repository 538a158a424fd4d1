//! Swap schedule generation.
//!
//! Two generators cover the two jobs schedules do here:
//!
//! - [`build_schedule`]: full valuation periods (adjusted accruals,
//!   payment dates, reset/fixing dates) with the backward/forward build
//!   modes of the leg convention
//! - [`stub_schedule_dates`] / [`bootstrap_periods`]: plain period
//!   boundaries with explicit stub classification, used by the curve
//!   bootstrappers' floating schedules

use ficc_core::types::{Date, Frequency};

use crate::conventions::{LegType, ResetPosition, StubType, SwapLegConvention};
use crate::error::{SwapError, SwapResult};

/// One payment period of a swap leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    /// Sequential period number, 1-based.
    pub index: usize,
    /// Unadjusted accrual start.
    pub accrual_start: Date,
    /// Unadjusted accrual end.
    pub accrual_end: Date,
    /// Adjusted accrual start.
    pub accrual_start_adj: Date,
    /// Adjusted accrual end.
    pub accrual_end_adj: Date,
    /// Rate reset date (floating legs).
    pub reset_date: Option<Date>,
    /// Rate fixing date (floating legs).
    pub fixing_date: Option<Date>,
    /// Payment date (accrual end plus any pay delay).
    pub payment_date: Date,
}

/// Builds the payment schedule for a swap leg.
///
/// Fixed legs (and any leg rolled `BackwardEom`) generate backward from
/// the maturity's day-of-month under the end-of-month rule; a backward
/// step that crosses the effective date turns the first period into a
/// stub starting exactly at the effective date. Floating legs generate
/// forward from the effective date, truncating the last period at
/// maturity.
///
/// # Errors
///
/// Returns an error for a frequency without a month count or an
/// effective date on or after maturity.
pub fn build_schedule(
    effective_date: Date,
    maturity_date: Date,
    convention: &SwapLegConvention,
) -> SwapResult<Vec<Period>> {
    let Some(months) = convention.pay_frequency.months() else {
        return Err(SwapError::UnsupportedFrequency {
            frequency: format!("{:?}", convention.pay_frequency),
        });
    };
    if effective_date >= maturity_date {
        return Err(SwapError::schedule(
            convention.id(),
            format!("effective {effective_date} is not before maturity {maturity_date}"),
        ));
    }

    let pairs = if convention.leg_type == LegType::Floating {
        forward_pairs(effective_date, maturity_date, months)?
    } else {
        backward_pairs(effective_date, maturity_date, months)?
    };

    let mut periods = Vec::with_capacity(pairs.len());
    for (start_unadj, end_unadj) in pairs {
        let accrual_start_adj = convention
            .calendar
            .adjust(start_unadj, convention.business_day_adjustment)?;
        let accrual_end_adj = convention
            .calendar
            .adjust(end_unadj, convention.business_day_adjustment)?;
        if accrual_start_adj >= accrual_end_adj {
            continue;
        }

        let payment_date = if convention.pay_delay_days > 0 {
            convention
                .calendar
                .add_business_days(accrual_end_adj, convention.pay_delay_days)
        } else {
            accrual_end_adj
        };

        let (reset_date, fixing_date) =
            reset_and_fixing_dates(convention, accrual_start_adj, accrual_end_adj);

        periods.push(Period {
            index: periods.len() + 1,
            accrual_start: start_unadj,
            accrual_end: end_unadj,
            accrual_start_adj,
            accrual_end_adj,
            reset_date,
            fixing_date,
            payment_date,
        });
    }

    Ok(periods)
}

/// Backward generation anchored to the maturity day-of-month.
fn backward_pairs(
    effective: Date,
    maturity: Date,
    months: i32,
) -> SwapResult<Vec<(Date, Date)>> {
    let mut pairs: Vec<(Date, Date)> = Vec::new();
    let mut current_end = maturity;
    let mut first_end_after_start: Option<Date> = None;

    while current_end > effective {
        let prev_start = current_end.add_months_eom(-months)?;
        if prev_start <= effective {
            // Landing exactly on the effective date keeps the regular
            // grid; landing inside a period starts a long first period
            // at the effective date, absorbing the broken anchor.
            first_end_after_start = Some(if prev_start == effective {
                current_end
            } else {
                current_end.add_months_eom(months)?
            });
            break;
        }
        pairs.push((prev_start, current_end));
        current_end = prev_start;
    }

    if let Some(first_end) = first_end_after_start {
        let prior_start = first_end.add_months_eom(-months)?;
        pairs.retain(|&(s, e)| !(s == prior_start && e == first_end));
        pairs.push((effective, first_end));
    }

    pairs.sort_by_key(|&(s, _)| s);
    Ok(pairs)
}

/// Forward generation from the effective date, truncated at maturity.
fn forward_pairs(
    effective: Date,
    maturity: Date,
    months: i32,
) -> SwapResult<Vec<(Date, Date)>> {
    let preserve_eom = effective.is_end_of_month();
    let mut pairs = Vec::new();
    let mut current_start = effective;

    while current_start < maturity {
        let stepped = if preserve_eom {
            current_start.add_months_eom(months)?
        } else {
            current_start.add_months(months)?
        };
        let current_end = stepped.min(maturity);
        if current_start >= current_end {
            break;
        }
        pairs.push((current_start, current_end));
        current_start = current_end;
    }

    Ok(pairs)
}

/// Reset and fixing dates per the leg's reset position.
fn reset_and_fixing_dates(
    convention: &SwapLegConvention,
    accrual_start_adj: Date,
    accrual_end_adj: Date,
) -> (Option<Date>, Option<Date>) {
    if convention.reset_frequency.is_none() {
        return (None, None);
    }

    match convention.reset_position {
        Some(ResetPosition::InAdvance) | None => {
            let reset = accrual_start_adj;
            let fixing = if convention.fixing_lag_days > 0 {
                convention
                    .calendar
                    .add_business_days(reset, -convention.fixing_lag_days)
            } else {
                reset
            };
            (Some(reset), Some(fixing))
        }
        Some(ResetPosition::InArrears) => (Some(accrual_end_adj), Some(accrual_end_adj)),
    }
}

/// Unadjusted period boundaries with explicit stub classification.
///
/// `NoStub` demands that regular periods land exactly on the maturity.
/// Final stubs generate forward and either cut the last period short or
/// merge the last two; initial stubs generate backward symmetrically.
///
/// # Errors
///
/// Returns an error for a frequency without a month count, or for
/// `NoStub` when the dates do not align.
pub fn stub_schedule_dates(
    effective: Date,
    maturity: Date,
    frequency: Frequency,
    stub_type: StubType,
) -> SwapResult<Vec<Date>> {
    let Some(months) = frequency.months() else {
        return Err(SwapError::UnsupportedFrequency {
            frequency: format!("{frequency:?}"),
        });
    };
    if effective >= maturity {
        return Err(SwapError::schedule(
            "stub-schedule",
            format!("effective {effective} is not before maturity {maturity}"),
        ));
    }

    match stub_type {
        StubType::NoStub => {
            let mut dates = vec![effective];
            let mut current = effective;
            while current < maturity {
                let next = current.add_months_eom(months)?;
                if next > maturity {
                    return Err(SwapError::schedule(
                        "stub-schedule",
                        "dates do not align for a no-stub schedule",
                    ));
                }
                dates.push(next);
                current = next;
            }
            Ok(dates)
        }
        StubType::ShortFinal => {
            let mut dates = vec![effective];
            let mut current = effective;
            loop {
                let next = current.add_months_eom(months)?;
                if next >= maturity {
                    dates.push(maturity);
                    break;
                }
                dates.push(next);
                current = next;
            }
            Ok(dates)
        }
        StubType::LongFinal => {
            let mut dates = vec![effective];
            let mut current = effective;
            loop {
                let next = current.add_months_eom(months)?;
                let following = next.add_months_eom(months)?;
                if following > maturity {
                    dates.push(maturity);
                    break;
                }
                dates.push(next);
                current = next;
            }
            Ok(dates)
        }
        StubType::ShortInitial | StubType::LongInitial => {
            // Regular periods backward from maturity
            let mut regular: Vec<Date> = Vec::new();
            let mut current = maturity;
            loop {
                let prev = current.add_months_eom(-months)?;
                if prev <= effective {
                    break;
                }
                regular.insert(0, prev);
                current = prev;
            }

            if regular.is_empty() {
                return Ok(vec![effective, maturity]);
            }

            if stub_type == StubType::LongInitial {
                let first_regular = regular[0];
                let prev_prev = first_regular.add_months_eom(-months)?;
                if prev_prev <= effective {
                    // Merge the stub with the first regular period
                    regular.remove(0);
                }
            }

            let mut dates = vec![effective];
            dates.extend(regular);
            dates.push(maturity);
            Ok(dates)
        }
    }
}

/// A floating accrual period used by the curve bootstrappers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapPeriod {
    /// Adjusted accrual start.
    pub accrual_start: Date,
    /// Adjusted accrual end.
    pub accrual_end: Date,
    /// Accrual fraction under the leg's day count.
    pub year_fraction: f64,
}

/// Adjusted floating periods between effective and maturity at the
/// leg's reset frequency, short-final stub, degenerate periods dropped.
///
/// # Errors
///
/// Returns an error when the convention has no reset frequency or the
/// schedule cannot be built.
pub fn bootstrap_periods(
    effective: Date,
    maturity: Date,
    convention: &SwapLegConvention,
) -> SwapResult<Vec<BootstrapPeriod>> {
    let Some(reset_frequency) = convention.reset_frequency else {
        return Err(SwapError::schedule(
            convention.id(),
            "floating schedule requires a reset frequency",
        ));
    };
    let dates = stub_schedule_dates(effective, maturity, reset_frequency, StubType::ShortFinal)?;

    let mut periods = Vec::with_capacity(dates.len().saturating_sub(1));
    let mut prev_end_adj: Option<Date> = None;
    for window in dates.windows(2) {
        let start_adj = match prev_end_adj {
            Some(prev) => prev,
            None => convention
                .calendar
                .adjust(window[0], convention.business_day_adjustment)?,
        };
        let end_adj = convention
            .calendar
            .adjust(window[1], convention.business_day_adjustment)?;
        prev_end_adj = Some(end_adj);

        let year_fraction = convention.day_count.year_fraction(start_adj, end_adj);
        if year_fraction <= 1e-12 {
            continue;
        }
        periods.push(BootstrapPeriod {
            accrual_start: start_adj,
            accrual_end: end_adj,
            year_fraction,
        });
    }
    Ok(periods)
}
