use rust_decimal::Decimal;

use crate::model::payroll::Payroll;
use crate::payroll::calculator::compute_totals;
use crate::payroll::hours::{HoursSource, check_hours, total_hours};
use crate::payroll::PayrollError;

/// Re-derives an existing payroll around a corrected hours total.
///
/// The stored earnings and deduction lines are reused as-is: line items keep
/// the amounts snapshotted at generation, while `total_deductions` is
/// re-applied from the stored percentages against the new total earned.
pub fn recalculate(payroll: &Payroll, hours_override: Decimal) -> Result<Payroll, PayrollError> {
    let total_hours = total_hours(HoursSource::Override(check_hours(hours_override)?));
    let totals = compute_totals(
        total_hours,
        payroll.hourly_rate,
        payroll.base_salary,
        &payroll.earnings,
        payroll.deductions.iter().map(|d| d.percentage),
    )?;

    Ok(Payroll {
        total_hours,
        amount_hours: totals.amount_hours,
        total_earned: totals.total_earned,
        total_deductions: totals.total_deductions,
        net: totals.net,
        ..payroll.clone()
    })
}
