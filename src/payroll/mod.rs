//! Attendance reconciliation and payroll computation.
//!
//! Everything except [`service`] is pure: plain data in, plain data out.
//! [`service`] wires those functions to a [`crate::store::PayrollStore`].

pub mod calculator;
pub mod error;
pub mod hours;
pub mod recalculate;
pub mod reconcile;
pub mod salary;
pub mod service;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

pub use error::PayrollError;

/// Rounds money and hours to cents, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// First and last calendar day of `month`/`year`.
pub fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), PayrollError> {
    let invalid = || PayrollError::validation("month", format!("{month}/{year} is not a calendar month"));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next.pred_opt().ok_or_else(invalid)?;

    Ok((first, last))
}
