use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One scheduled work interval at a facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Shift {
    #[schema(example = 31)]
    pub id: u64,

    #[schema(example = 4)]
    pub schedule_id: u64,

    #[schema(example = "2026-07-14", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "10:00:00", value_type = String, format = "time")]
    pub start_time: NaiveTime,

    #[schema(example = "18:00:00", value_type = String, format = "time")]
    pub end_time: NaiveTime,

    #[schema(example = 2)]
    pub facility_id: u64,
}

/// Monthly schedule (cuadrante) of one employee. At most one exists per
/// (employee, month, year).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSchedule {
    pub id: u64,
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,
    pub shifts: Vec<Shift>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct WorkScheduleRow {
    pub id: u64,
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,
}

impl WorkScheduleRow {
    pub fn with_shifts(self, mut shifts: Vec<Shift>) -> WorkSchedule {
        shifts.sort_by_key(|s| (s.date, s.start_time, s.id));
        WorkSchedule {
            id: self.id,
            employee_id: self.employee_id,
            month: self.month,
            year: self.year,
            shifts,
        }
    }
}
