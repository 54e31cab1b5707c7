pub mod attendance;
pub mod employee;
pub mod payroll;
pub mod role;
pub mod salary_template;
pub mod schedule;
