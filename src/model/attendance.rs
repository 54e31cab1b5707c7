use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A raw clock-in/clock-out event as recorded in the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    /// Auto-increment id; a higher id was recorded later.
    #[schema(example = 901)]
    pub id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = 2)]
    pub facility_id: u64,

    #[schema(example = "2026-07-14", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "10:00:00", value_type = Option<String>, format = "time", nullable = true)]
    pub check_in: Option<NaiveTime>,

    #[schema(example = "18:00:00", value_type = Option<String>, format = "time", nullable = true)]
    pub check_out: Option<NaiveTime>,

    #[schema(nullable = true)]
    pub check_in_note: Option<String>,

    #[schema(nullable = true)]
    pub check_out_note: Option<String>,

    #[schema(example = "Medical appointment", nullable = true)]
    pub absence_reason: Option<String>,

    /// Reference to the uploaded justification document.
    #[schema(nullable = true)]
    pub justification: Option<String>,
}

impl AttendanceRecord {
    pub fn is_justified(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.absence_reason) || filled(&self.justification)
    }
}
