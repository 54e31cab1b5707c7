//! Storage capabilities the payroll operations need, and their adapters.

pub mod mysql;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::{
    attendance::AttendanceRecord,
    employee::Employee,
    payroll::{NewPayroll, Payroll},
    salary_template::RoleSalaryTemplate,
    schedule::WorkSchedule,
};
use crate::payroll::PayrollError;

#[async_trait]
pub trait PayrollStore: Send + Sync {
    async fn find_employee(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError>;

    async fn find_schedule(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<WorkSchedule>, PayrollError>;

    /// Records whose date falls in `from..=to`.
    async fn list_attendance(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, PayrollError>;

    async fn find_salary_template(
        &self,
        role_name: &str,
    ) -> Result<Option<RoleSalaryTemplate>, PayrollError>;

    /// Stores a new payroll. Must fail with [`PayrollError::Conflict`] when one
    /// already exists for the same (employee, month, year), atomically with
    /// respect to concurrent inserts.
    async fn insert_payroll(&self, payroll: NewPayroll) -> Result<Payroll, PayrollError>;

    async fn find_payroll(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<Payroll>, PayrollError>;

    /// Newest period first.
    async fn list_payrolls(&self, employee_id: u64) -> Result<Vec<Payroll>, PayrollError>;

    /// Overwrites the hours and totals of an existing payroll, by id.
    async fn update_payroll(&self, payroll: &Payroll) -> Result<Payroll, PayrollError>;
}
