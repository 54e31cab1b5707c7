use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use moka::future::Cache;
use sqlx::{MySqlPool, types::Json};
use tracing::{debug, error};

use crate::model::{
    attendance::AttendanceRecord,
    employee::{Employee, EmployeeRow},
    payroll::{NewPayroll, Payroll, PayrollRow},
    salary_template::{RoleSalaryTemplate, RoleSalaryTemplateRow},
    schedule::{Shift, WorkSchedule, WorkScheduleRow},
};
use crate::payroll::PayrollError;
use crate::store::PayrollStore;

const PAYROLL_COLUMNS: &str = r#"
    id, employee_id, month, year, total_hours, hourly_rate, base_salary,
    amount_hours, earnings, deductions, total_earned, total_deductions, net,
    created_at, updated_at
"#;

/// MySQL adapter. Cheap to clone; role salary templates are memoized for the
/// configured TTL.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
    templates: Cache<String, RoleSalaryTemplate>,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool, template_ttl: Duration, template_capacity: u64) -> Self {
        let templates = Cache::builder()
            .max_capacity(template_capacity)
            .time_to_live(template_ttl)
            .build();

        Self { pool, templates }
    }

    async fn payroll_by_id(&self, id: u64) -> Result<Option<Payroll>, PayrollError> {
        let sql = format!("SELECT {PAYROLL_COLUMNS} FROM payroll WHERE id = ?");
        let row = sqlx::query_as::<_, PayrollRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Payroll::from))
    }
}

/// Only a unique-key violation means the payroll already exists; other
/// integrity errors (foreign key, NOT NULL) share SQLSTATE 23000.
fn is_duplicate_key(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl PayrollStore for MySqlStore {
    async fn find_employee(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError> {
        let row = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, name, role, hourly_rate, hire_date
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Employee::from))
    }

    async fn find_schedule(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<WorkSchedule>, PayrollError> {
        let schedule = sqlx::query_as::<_, WorkScheduleRow>(
            r#"
            SELECT id, employee_id, month, year
            FROM work_schedules
            WHERE employee_id = ? AND month = ? AND year = ?
            "#,
        )
        .bind(employee_id)
        .bind(month)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        let Some(schedule) = schedule else {
            return Ok(None);
        };

        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, schedule_id, date, start_time, end_time, facility_id
            FROM shifts
            WHERE schedule_id = ?
            ORDER BY date, start_time
            "#,
        )
        .bind(schedule.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(schedule.with_shifts(shifts)))
    }

    async fn list_attendance(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, PayrollError> {
        let records = sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT id, employee_id, facility_id, date, check_in, check_out,
                   check_in_note, check_out_note, absence_reason, justification
            FROM attendance_records
            WHERE employee_id = ? AND date BETWEEN ? AND ?
            ORDER BY date, id
            "#,
        )
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_salary_template(
        &self,
        role_name: &str,
    ) -> Result<Option<RoleSalaryTemplate>, PayrollError> {
        if let Some(template) = self.templates.get(role_name).await {
            debug!(role_name, "Salary template served from cache");
            return Ok(Some(template));
        }

        let row = sqlx::query_as::<_, RoleSalaryTemplateRow>(
            r#"
            SELECT id, role_name, base_salary, earnings, deductions
            FROM role_salary_templates
            WHERE role_name = ?
            "#,
        )
        .bind(role_name)
        .fetch_optional(&self.pool)
        .await?;

        let template = row.map(RoleSalaryTemplate::from);
        if let Some(template) = &template {
            self.templates
                .insert(role_name.to_string(), template.clone())
                .await;
        }

        Ok(template)
    }

    async fn insert_payroll(&self, payroll: NewPayroll) -> Result<Payroll, PayrollError> {
        let result = sqlx::query(
            r#"
            INSERT INTO payroll
            (employee_id, month, year, total_hours, hourly_rate, base_salary,
             amount_hours, earnings, deductions, total_earned, total_deductions, net)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payroll.employee_id)
        .bind(payroll.month)
        .bind(payroll.year)
        .bind(payroll.total_hours)
        .bind(payroll.hourly_rate)
        .bind(payroll.base_salary)
        .bind(payroll.amount_hours)
        .bind(Json(&payroll.earnings))
        .bind(Json(&payroll.deductions))
        .bind(payroll.total_earned)
        .bind(payroll.total_deductions)
        .bind(payroll.net)
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(r) => r,
            Err(e) if is_duplicate_key(&e) => {
                return Err(PayrollError::Conflict {
                    employee_id: payroll.employee_id,
                    month: payroll.month,
                    year: payroll.year,
                });
            }
            Err(e) => {
                error!(error = %e, employee_id = payroll.employee_id, "Failed to insert payroll");
                return Err(e.into());
            }
        };

        let id = result.last_insert_id();
        self.payroll_by_id(id)
            .await?
            .ok_or_else(|| PayrollError::not_found("payroll", format!("id {id}")))
    }

    async fn find_payroll(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<Payroll>, PayrollError> {
        let sql = format!(
            "SELECT {PAYROLL_COLUMNS} FROM payroll WHERE employee_id = ? AND month = ? AND year = ?"
        );
        let row = sqlx::query_as::<_, PayrollRow>(&sql)
            .bind(employee_id)
            .bind(month)
            .bind(year)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Payroll::from))
    }

    async fn list_payrolls(&self, employee_id: u64) -> Result<Vec<Payroll>, PayrollError> {
        let sql = format!(
            "SELECT {PAYROLL_COLUMNS} FROM payroll WHERE employee_id = ? ORDER BY year DESC, month DESC"
        );
        let rows = sqlx::query_as::<_, PayrollRow>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Payroll::from).collect())
    }

    async fn update_payroll(&self, payroll: &Payroll) -> Result<Payroll, PayrollError> {
        sqlx::query(
            r#"
            UPDATE payroll
            SET total_hours = ?, amount_hours = ?, total_earned = ?,
                total_deductions = ?, net = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(payroll.total_hours)
        .bind(payroll.amount_hours)
        .bind(payroll.total_earned)
        .bind(payroll.total_deductions)
        .bind(payroll.net)
        .bind(payroll.id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, payroll_id = payroll.id, "Failed to update payroll");
            e
        })?;

        // MySQL reports unchanged rows as unaffected, so existence is checked by reading back.
        self.payroll_by_id(payroll.id)
            .await?
            .ok_or_else(|| PayrollError::not_found("payroll", format!("id {}", payroll.id)))
    }
}
