use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::warn;

use crate::model::{
    employee::{Employee, EmployeeRole},
    payroll::EarningLine,
    salary_template::{RoleSalaryTemplate, TemplateDeduction},
};
use crate::payroll::{PayrollError, round2};

/// Per-role hourly rates that predate salary templates. Only consulted when an
/// employee has no rate of their own.
static LEGACY_HOURLY_RATES: Lazy<HashMap<&'static str, Decimal>> = Lazy::new(|| {
    HashMap::from([
        ("Boss", dec!(15.00)),
        ("Coordinator", dec!(12.50)),
        ("Lifeguard", dec!(10.00)),
    ])
});

/// A role's pay structure with every earning expanded to an absolute amount.
/// Deductions stay as percentages; their amount depends on the total earned.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSalary {
    pub role_name: String,
    pub base_salary: Decimal,
    pub earnings: Vec<EarningLine>,
    pub deductions: Vec<TemplateDeduction>,
}

pub fn resolve_salary(
    role: &EmployeeRole,
    template: Option<&RoleSalaryTemplate>,
) -> Result<ResolvedSalary, PayrollError> {
    let template = template.ok_or_else(|| {
        PayrollError::Configuration(format!("no salary template configured for role {role}"))
    })?;

    if template.base_salary.is_sign_negative() && !template.base_salary.is_zero() {
        return Err(PayrollError::Configuration(format!(
            "salary template for role {} has a negative base salary",
            template.role_name
        )));
    }

    let earnings = template
        .earnings
        .iter()
        .map(|earning| {
            let amount = match (earning.percentage, earning.amount) {
                (Some(pct), _) => round2(template.base_salary * pct / dec!(100)),
                (None, Some(amount)) => amount,
                (None, None) => {
                    return Err(PayrollError::Configuration(format!(
                        "earning '{}' of role {} has neither amount nor percentage",
                        earning.name, template.role_name
                    )));
                }
            };
            Ok(EarningLine {
                name: earning.name.clone(),
                amount,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(bad) = template
        .deductions
        .iter()
        .find(|d| d.percentage.is_sign_negative() && !d.percentage.is_zero())
    {
        return Err(PayrollError::Configuration(format!(
            "deduction '{}' of role {} has a negative percentage",
            bad.name, template.role_name
        )));
    }

    Ok(ResolvedSalary {
        role_name: template.role_name.clone(),
        base_salary: template.base_salary,
        earnings,
        deductions: template.deductions.clone(),
    })
}

/// The employee's own hourly rate, or the legacy per-role rate when none is
/// recorded.
pub fn effective_hourly_rate(employee: &Employee) -> Decimal {
    if let Some(rate) = employee.hourly_rate {
        return rate;
    }

    match LEGACY_HOURLY_RATES.get(employee.role.as_str()) {
        Some(rate) => *rate,
        None => {
            warn!(
                employee_id = employee.id,
                role = %employee.role,
                "No hourly rate recorded and no legacy rate for role, using zero"
            );
            Decimal::ZERO
        }
    }
}
