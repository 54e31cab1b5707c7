use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tracing::warn;

use crate::payroll::reconcile::{AttendanceStatus, ReconciledEntry};
use crate::payroll::{PayrollError, round2};

const SECONDS_PER_HOUR: i64 = 3600;

/// Largest total the `DECIMAL(10,2)` hours column holds.
pub const MAX_TOTAL_HOURS: Decimal = dec!(99999999.99);

/// Where a month's worked hours come from.
#[derive(Debug, Clone, Copy)]
pub enum HoursSource<'a> {
    /// Sum of the present days.
    Reconciled(&'a [ReconciledEntry]),
    /// A supervisor-asserted total, used verbatim.
    Override(Decimal),
}

pub fn total_hours(source: HoursSource<'_>) -> Decimal {
    match source {
        HoursSource::Reconciled(entries) => aggregate_hours(entries),
        HoursSource::Override(hours) => round2(hours),
    }
}

/// Hours worked on one reconciled day.
///
/// Only `present` days count. Same-day arithmetic: a check-out earlier than
/// the check-in is reported, never clamped.
pub fn entry_hours(entry: &ReconciledEntry) -> Result<Decimal, PayrollError> {
    if entry.status != AttendanceStatus::Present {
        return Ok(Decimal::ZERO);
    }

    let record = entry.attendance_record.as_ref();
    let (Some(check_in), Some(check_out)) = (
        record.and_then(|r| r.check_in),
        record.and_then(|r| r.check_out),
    ) else {
        return Err(PayrollError::validation(
            format!("attendance on {}", entry.date),
            "present day without both check-in and check-out",
        ));
    };

    let worked = entry.date.and_time(check_out) - entry.date.and_time(check_in);
    if worked.num_seconds() < 0 {
        return Err(PayrollError::validation(
            format!("attendance on {}", entry.date),
            "check-out is earlier than check-in",
        ));
    }

    Ok(Decimal::from(worked.num_seconds()) / Decimal::from(SECONDS_PER_HOUR))
}

/// Total hours worked across the reconciled month, rounded to cents.
///
/// A malformed day contributes nothing and is logged; it never aborts the
/// rest of the month.
pub fn aggregate_hours(entries: &[ReconciledEntry]) -> Decimal {
    let total: Decimal = entries
        .iter()
        .filter_map(|entry| match entry_hours(entry) {
            Ok(hours) => Some(hours),
            Err(e) => {
                warn!(date = %entry.date, error = %e, "Skipping day in hours aggregation");
                None
            }
        })
        .sum();

    round2(total)
}

/// Parses a user-supplied total-hours override. Accepts a JSON number or a
/// numeric string; negative values are rejected.
pub fn parse_hours_override(value: &Value) -> Result<Decimal, PayrollError> {
    let invalid = || PayrollError::validation("total_hours", format!("{value} is not a number"));

    let hours = match value {
        Value::Number(n) => {
            let text = n.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|_| invalid())?
        }
        Value::String(s) => Decimal::from_str(s.trim()).map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    check_hours(hours).map(round2)
}

/// Rejects totals that are negative or too large to store.
pub fn check_hours(hours: Decimal) -> Result<Decimal, PayrollError> {
    if hours.is_sign_negative() && !hours.is_zero() {
        return Err(PayrollError::validation("total_hours", "must not be negative"));
    }
    if hours > MAX_TOTAL_HOURS {
        return Err(PayrollError::validation(
            "total_hours",
            format!("must not exceed {MAX_TOTAL_HOURS}"),
        ));
    }

    Ok(hours)
}
