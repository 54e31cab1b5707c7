use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Job role of an employee. The catalog is open-ended: role names that are not
/// one of the built-in ones are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmployeeRole {
    Boss,
    Lifeguard,
    Coordinator,
    Other(String),
}

impl EmployeeRole {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "boss" => EmployeeRole::Boss,
            "lifeguard" => EmployeeRole::Lifeguard,
            "coordinator" => EmployeeRole::Coordinator,
            _ => EmployeeRole::Other(name.trim().to_string()),
        }
    }

    /// Name used as the key of the role's salary template.
    pub fn as_str(&self) -> &str {
        match self {
            EmployeeRole::Boss => "Boss",
            EmployeeRole::Lifeguard => "Lifeguard",
            EmployeeRole::Coordinator => "Coordinator",
            EmployeeRole::Other(name) => name,
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EmployeeRole {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EmployeeRole {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(EmployeeRole::from_name(&name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "name": "Lucia Romero",
        "role": "Lifeguard",
        "hourly_rate": "15.00",
        "hire_date": "2024-06-01"
    })
)]
pub struct Employee {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = "Lucia Romero")]
    pub name: String,

    #[schema(example = "Lifeguard", value_type = String)]
    pub role: EmployeeRole,

    /// Missing for staff hired before rates were tracked per person.
    #[schema(example = "15.00", value_type = Option<String>, nullable = true)]
    pub hourly_rate: Option<Decimal>,

    #[schema(example = "2024-06-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
}

/// Row shape of the `employees` table; the role is stored by name.
#[derive(Debug, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: u64,
    pub name: String,
    pub role: String,
    pub hourly_rate: Option<Decimal>,
    pub hire_date: NaiveDate,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Employee {
            id: row.id,
            name: row.name,
            role: EmployeeRole::from_name(&row.role),
            hourly_rate: row.hourly_rate,
            hire_date: row.hire_date,
        }
    }
}
