use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EarningLine {
    #[schema(example = "Extra Payment July")]
    pub name: String,

    #[schema(example = "100.00", value_type = String)]
    pub amount: Decimal,
}

/// Deduction as snapshotted on a payroll: the originating percentage is kept
/// for display next to the amount computed at generation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeductionLine {
    #[schema(example = "SS")]
    pub name: String,

    #[schema(example = "6.35", value_type = String)]
    pub percentage: Decimal,

    #[schema(example = "171.45", value_type = String)]
    pub amount: Decimal,
}

/// A payroll that has been computed but not stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayroll {
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,
    pub total_hours: Decimal,
    pub hourly_rate: Decimal,
    pub base_salary: Decimal,
    pub amount_hours: Decimal,
    pub earnings: Vec<EarningLine>,
    pub deductions: Vec<DeductionLine>,
    pub total_earned: Decimal,
    pub total_deductions: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 12,
        "employee_id": 7,
        "month": 7,
        "year": 2026,
        "total_hours": "160.00",
        "hourly_rate": "10.00",
        "base_salary": "1000.00",
        "amount_hours": "1600.00",
        "earnings": [{"name": "Extra Payment July", "amount": "100.00"}],
        "deductions": [{"name": "SS", "percentage": "6.35", "amount": "171.45"}],
        "total_earned": "2700.00",
        "total_deductions": "171.45",
        "net": "2528.55",
        "created_at": "2026-08-01T09:00:00Z",
        "updated_at": "2026-08-01T09:00:00Z"
    })
)]
pub struct Payroll {
    pub id: u64,
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,

    #[schema(value_type = String)]
    pub total_hours: Decimal,

    /// Rate snapshotted at generation; corrections reuse it.
    #[schema(value_type = String)]
    pub hourly_rate: Decimal,

    #[schema(value_type = String)]
    pub base_salary: Decimal,

    #[schema(value_type = String)]
    pub amount_hours: Decimal,

    pub earnings: Vec<EarningLine>,
    pub deductions: Vec<DeductionLine>,

    #[schema(value_type = String)]
    pub total_earned: Decimal,

    #[schema(value_type = String)]
    pub total_deductions: Decimal,

    #[schema(value_type = String)]
    pub net: Decimal,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(value_type = Option<String>, format = "date-time")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Payroll {
    pub fn from_new(id: u64, new: NewPayroll, now: DateTime<Utc>) -> Self {
        Payroll {
            id,
            employee_id: new.employee_id,
            month: new.month,
            year: new.year,
            total_hours: new.total_hours,
            hourly_rate: new.hourly_rate,
            base_salary: new.base_salary,
            amount_hours: new.amount_hours,
            earnings: new.earnings,
            deductions: new.deductions,
            total_earned: new.total_earned,
            total_deductions: new.total_deductions,
            net: new.net,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PayrollRow {
    pub id: u64,
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,
    pub total_hours: Decimal,
    pub hourly_rate: Decimal,
    pub base_salary: Decimal,
    pub amount_hours: Decimal,
    pub earnings: Json<Vec<EarningLine>>,
    pub deductions: Json<Vec<DeductionLine>>,
    pub total_earned: Decimal,
    pub total_deductions: Decimal,
    pub net: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<PayrollRow> for Payroll {
    fn from(row: PayrollRow) -> Self {
        Payroll {
            id: row.id,
            employee_id: row.employee_id,
            month: row.month,
            year: row.year,
            total_hours: row.total_hours,
            hourly_rate: row.hourly_rate,
            base_salary: row.base_salary,
            amount_hours: row.amount_hours,
            earnings: row.earnings.0,
            deductions: row.deductions.0,
            total_earned: row.total_earned,
            total_deductions: row.total_deductions,
            net: row.net,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
