use chrono::Month;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::model::payroll::{DeductionLine, EarningLine, NewPayroll};
use crate::payroll::hours::check_hours;
use crate::payroll::salary::ResolvedSalary;
use crate::payroll::{PayrollError, month_bounds, round2};

/// Earnings name that templates use for a monthly bonus. Matched as a
/// substring and replaced by "Extra Payment <Month>".
// TODO: give bonus lines an explicit "monthly" flag in the template JSON so
// this no longer depends on the line's display name.
pub const EXTRA_PAYMENT_PLACEHOLDER: &str = "Extra Payment X";

#[derive(Debug, Clone)]
pub struct PayrollInput<'a> {
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,
    pub total_hours: Decimal,
    pub hourly_rate: Decimal,
    pub salary: &'a ResolvedSalary,
}

/// Figures derived from hours, rate and line items.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Totals {
    pub amount_hours: Decimal,
    pub total_earned: Decimal,
    pub deduction_amounts: Vec<Decimal>,
    pub total_deductions: Decimal,
    pub net: Decimal,
}

pub(crate) fn compute_totals(
    total_hours: Decimal,
    hourly_rate: Decimal,
    base_salary: Decimal,
    earnings: &[EarningLine],
    deduction_percentages: impl IntoIterator<Item = Decimal>,
) -> Result<Totals, PayrollError> {
    let amount_hours = total_hours
        .checked_mul(hourly_rate)
        .map(round2)
        .ok_or_else(|| out_of_range("amount_hours"))?;
    let earned_extra = earnings
        .iter()
        .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.amount))
        .ok_or_else(|| out_of_range("earnings"))?;
    let total_earned = amount_hours
        .checked_add(base_salary)
        .and_then(|sum| sum.checked_add(earned_extra))
        .map(round2)
        .ok_or_else(|| out_of_range("total_earned"))?;

    let deduction_amounts = deduction_percentages
        .into_iter()
        .map(|pct| {
            total_earned
                .checked_mul(pct)
                .map(|v| round2(v / dec!(100)))
                .ok_or_else(|| out_of_range("deductions"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let total_deductions = deduction_amounts
        .iter()
        .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(*d))
        .map(round2)
        .ok_or_else(|| out_of_range("total_deductions"))?;
    let net = total_earned
        .checked_sub(total_deductions)
        .map(round2)
        .ok_or_else(|| out_of_range("net"))?;

    Ok(Totals {
        amount_hours,
        total_earned,
        deduction_amounts,
        total_deductions,
        net,
    })
}

fn out_of_range(field: &str) -> PayrollError {
    PayrollError::validation(field, "amount exceeds the supported range")
}

/// Rewrites the monthly bonus placeholder to name the payroll's month.
pub fn name_earning_for_month(name: &str, month: Month) -> String {
    if name.contains(EXTRA_PAYMENT_PLACEHOLDER) {
        name.replace(
            EXTRA_PAYMENT_PLACEHOLDER,
            &format!("Extra Payment {}", month.name()),
        )
    } else {
        name.to_string()
    }
}

/// Builds the payroll for one employee and month. Earnings and deduction
/// lines are copied out of the resolved template, so later template edits do
/// not touch this payroll.
pub fn calculate_payroll(input: PayrollInput<'_>) -> Result<NewPayroll, PayrollError> {
    month_bounds(input.month, input.year)?;
    let month = u8::try_from(input.month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| PayrollError::validation("month", format!("{} is not a month", input.month)))?;

    let total_hours = round2(check_hours(input.total_hours)?);

    let salary = input.salary;
    let earnings: Vec<EarningLine> = salary
        .earnings
        .iter()
        .map(|e| EarningLine {
            name: name_earning_for_month(&e.name, month),
            amount: e.amount,
        })
        .collect();

    let totals = compute_totals(
        total_hours,
        input.hourly_rate,
        salary.base_salary,
        &earnings,
        salary.deductions.iter().map(|d| d.percentage),
    )?;

    let deductions = salary
        .deductions
        .iter()
        .zip(&totals.deduction_amounts)
        .map(|(d, amount)| DeductionLine {
            name: d.name.clone(),
            percentage: d.percentage,
            amount: *amount,
        })
        .collect();

    Ok(NewPayroll {
        employee_id: input.employee_id,
        month: input.month,
        year: input.year,
        total_hours,
        hourly_rate: input.hourly_rate,
        base_salary: salary.base_salary,
        amount_hours: totals.amount_hours,
        earnings,
        deductions,
        total_earned: totals.total_earned,
        total_deductions: totals.total_deductions,
        net: totals.net,
    })
}
