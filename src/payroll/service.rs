use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::model::{employee::Employee, payroll::Payroll};
use crate::payroll::calculator::{PayrollInput, calculate_payroll};
use crate::payroll::hours::{HoursSource, total_hours};
use crate::payroll::recalculate::recalculate;
use crate::payroll::reconcile::{ReconciledEntry, reconcile};
use crate::payroll::salary::{effective_hourly_rate, resolve_salary};
use crate::payroll::{PayrollError, month_bounds};
use crate::store::PayrollStore;

pub use crate::payroll::hours::aggregate_hours;

fn period_key(employee_id: u64, month: u32, year: i32) -> String {
    format!("employee {employee_id}, {month}/{year}")
}

async fn require_employee(
    store: &dyn PayrollStore,
    employee_id: u64,
) -> Result<Employee, PayrollError> {
    store
        .find_employee(employee_id)
        .await?
        .ok_or_else(|| PayrollError::not_found("employee", employee_id.to_string()))
}

/// Reconciled attendance of one employee for a month. A month without a
/// schedule is not an error here: every recorded day is then a rest day.
#[instrument(skip(store))]
pub async fn reconcile_attendance(
    store: &dyn PayrollStore,
    employee_id: u64,
    month: u32,
    year: i32,
    today: NaiveDate,
) -> Result<Vec<ReconciledEntry>, PayrollError> {
    let (first, last) = month_bounds(month, year)?;
    let employee = require_employee(store, employee_id).await?;

    let schedule = store.find_schedule(employee.id, month, year).await?;
    let records = store.list_attendance(employee.id, first, last).await?;

    reconcile(employee.id, month, year, schedule.as_ref(), &records, today)
}

/// Computes and stores the payroll of one employee for a month.
///
/// Fails with `Conflict` if the month already has a payroll; corrections go
/// through [`recalculate_payroll`]. Nothing is stored unless every step
/// succeeds.
#[instrument(skip(store))]
pub async fn generate_payroll(
    store: &dyn PayrollStore,
    employee_id: u64,
    month: u32,
    year: i32,
    today: NaiveDate,
) -> Result<Payroll, PayrollError> {
    let (first, last) = month_bounds(month, year)?;
    let employee = require_employee(store, employee_id).await?;

    let schedule = store
        .find_schedule(employee.id, month, year)
        .await?
        .ok_or_else(|| {
            PayrollError::not_found("work schedule", period_key(employee.id, month, year))
        })?;

    let template = store.find_salary_template(employee.role.as_str()).await?;
    let salary = resolve_salary(&employee.role, template.as_ref())?;

    let records = store.list_attendance(employee.id, first, last).await?;
    let entries = reconcile(employee.id, month, year, Some(&schedule), &records, today)?;
    let hours = total_hours(HoursSource::Reconciled(&entries));

    let new = calculate_payroll(PayrollInput {
        employee_id: employee.id,
        month,
        year,
        total_hours: hours,
        hourly_rate: effective_hourly_rate(&employee),
        salary: &salary,
    })?;

    let payroll = store.insert_payroll(new).await?;

    info!(
        payroll_id = payroll.id,
        employee_id,
        month,
        year,
        total_hours = %payroll.total_hours,
        net = %payroll.net,
        "Payroll generated"
    );

    Ok(payroll)
}

/// Re-derives a stored payroll around a supervisor-supplied hours total.
/// Attendance is not looked at again.
#[instrument(skip(store))]
pub async fn recalculate_payroll(
    store: &dyn PayrollStore,
    employee_id: u64,
    month: u32,
    year: i32,
    hours_override: Decimal,
) -> Result<Payroll, PayrollError> {
    month_bounds(month, year)?;

    let existing = store
        .find_payroll(employee_id, month, year)
        .await?
        .ok_or_else(|| PayrollError::not_found("payroll", period_key(employee_id, month, year)))?;

    let updated = recalculate(&existing, hours_override)?;
    let stored = store.update_payroll(&updated).await?;

    info!(
        payroll_id = stored.id,
        employee_id,
        month,
        year,
        previous_hours = %existing.total_hours,
        total_hours = %stored.total_hours,
        net = %stored.net,
        "Payroll recalculated"
    );

    Ok(stored)
}

pub async fn get_payroll(
    store: &dyn PayrollStore,
    employee_id: u64,
    month: u32,
    year: i32,
) -> Result<Payroll, PayrollError> {
    month_bounds(month, year)?;

    store
        .find_payroll(employee_id, month, year)
        .await?
        .ok_or_else(|| PayrollError::not_found("payroll", period_key(employee_id, month, year)))
}

pub async fn list_payrolls(
    store: &dyn PayrollStore,
    employee_id: u64,
) -> Result<Vec<Payroll>, PayrollError> {
    require_employee(store, employee_id).await?;
    store.list_payrolls(employee_id).await
}
