use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::model::{
    attendance::AttendanceRecord,
    employee::Employee,
    payroll::{NewPayroll, Payroll},
    salary_template::RoleSalaryTemplate,
    schedule::WorkSchedule,
};
use crate::payroll::PayrollError;
use crate::store::PayrollStore;

#[derive(Default)]
struct Tables {
    employees: HashMap<u64, Employee>,
    schedules: Vec<WorkSchedule>,
    attendance: Vec<AttendanceRecord>,
    templates: HashMap<String, RoleSalaryTemplate>,
    payrolls: Vec<Payroll>,
    next_payroll_id: u64,
}

/// In-process store with the same uniqueness guarantees as the MySQL one.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employee(self, employee: Employee) -> Self {
        self.write().employees.insert(employee.id, employee);
        self
    }

    pub fn with_schedule(self, schedule: WorkSchedule) -> Self {
        self.write().schedules.push(schedule);
        self
    }

    pub fn with_attendance(self, records: Vec<AttendanceRecord>) -> Self {
        self.write().attendance.extend(records);
        self
    }

    pub fn with_template(self, template: RoleSalaryTemplate) -> Self {
        self.write()
            .templates
            .insert(template.role_name.clone(), template);
        self
    }

    pub fn payroll_count(&self) -> usize {
        self.read().payrolls.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().expect("memory store poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().expect("memory store poisoned")
    }
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn find_employee(&self, employee_id: u64) -> Result<Option<Employee>, PayrollError> {
        Ok(self.read().employees.get(&employee_id).cloned())
    }

    async fn find_schedule(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<WorkSchedule>, PayrollError> {
        Ok(self
            .read()
            .schedules
            .iter()
            .find(|s| s.employee_id == employee_id && s.month == month && s.year == year)
            .cloned())
    }

    async fn list_attendance(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, PayrollError> {
        Ok(self
            .read()
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= from && r.date <= to)
            .cloned()
            .collect())
    }

    async fn find_salary_template(
        &self,
        role_name: &str,
    ) -> Result<Option<RoleSalaryTemplate>, PayrollError> {
        Ok(self.read().templates.get(role_name).cloned())
    }

    async fn insert_payroll(&self, payroll: NewPayroll) -> Result<Payroll, PayrollError> {
        let mut tables = self.write();

        let exists = tables.payrolls.iter().any(|p| {
            p.employee_id == payroll.employee_id
                && p.month == payroll.month
                && p.year == payroll.year
        });
        if exists {
            return Err(PayrollError::Conflict {
                employee_id: payroll.employee_id,
                month: payroll.month,
                year: payroll.year,
            });
        }

        tables.next_payroll_id += 1;
        let stored = Payroll::from_new(tables.next_payroll_id, payroll, Utc::now());
        tables.payrolls.push(stored.clone());
        Ok(stored)
    }

    async fn find_payroll(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<Option<Payroll>, PayrollError> {
        Ok(self
            .read()
            .payrolls
            .iter()
            .find(|p| p.employee_id == employee_id && p.month == month && p.year == year)
            .cloned())
    }

    async fn list_payrolls(&self, employee_id: u64) -> Result<Vec<Payroll>, PayrollError> {
        let mut payrolls: Vec<Payroll> = self
            .read()
            .payrolls
            .iter()
            .filter(|p| p.employee_id == employee_id)
            .cloned()
            .collect();
        payrolls.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
        Ok(payrolls)
    }

    async fn update_payroll(&self, payroll: &Payroll) -> Result<Payroll, PayrollError> {
        let mut tables = self.write();
        let stored = tables
            .payrolls
            .iter_mut()
            .find(|p| p.id == payroll.id)
            .ok_or_else(|| PayrollError::not_found("payroll", format!("id {}", payroll.id)))?;

        stored.total_hours = payroll.total_hours;
        stored.amount_hours = payroll.amount_hours;
        stored.total_earned = payroll.total_earned;
        stored.total_deductions = payroll.total_deductions;
        stored.net = payroll.net;
        stored.updated_at = Some(Utc::now());

        Ok(stored.clone())
    }
}
