use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// Earnings line as configured on a role. Exactly one of `amount` and
/// `percentage` (of base salary) is expected; `percentage` wins if both are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateEarning {
    #[schema(example = "Extra Payment X")]
    pub name: String,

    #[serde(default)]
    #[schema(example = "100.00", value_type = Option<String>, nullable = true)]
    pub amount: Option<Decimal>,

    #[serde(default)]
    #[schema(value_type = Option<String>, nullable = true)]
    pub percentage: Option<Decimal>,
}

/// Deduction line as configured on a role, always a percentage of total earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateDeduction {
    #[schema(example = "SS")]
    pub name: String,

    #[schema(example = "6.35", value_type = String)]
    pub percentage: Decimal,
}

/// Base pay plus standard earnings/deductions of a role, keyed by role name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSalaryTemplate {
    pub id: u64,
    pub role_name: String,
    pub base_salary: Decimal,
    pub earnings: Vec<TemplateEarning>,
    pub deductions: Vec<TemplateDeduction>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RoleSalaryTemplateRow {
    pub id: u64,
    pub role_name: String,
    pub base_salary: Decimal,
    pub earnings: Json<Vec<TemplateEarning>>,
    pub deductions: Json<Vec<TemplateDeduction>>,
}

impl From<RoleSalaryTemplateRow> for RoleSalaryTemplate {
    fn from(row: RoleSalaryTemplateRow) -> Self {
        RoleSalaryTemplate {
            id: row.id,
            role_name: row.role_name,
            base_salary: row.base_salary,
            earnings: row.earnings.0,
            deductions: row.deductions.0,
        }
    }
}
