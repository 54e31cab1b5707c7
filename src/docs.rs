use crate::api::attendance::{ReconciledAttendanceResponse, ReconciledQuery};
use crate::api::payroll::{
    GeneratePayroll, PayrollListResponse, PayrollQuery, RecalculatePayroll,
};
use crate::model::attendance::AttendanceRecord;
use crate::model::payroll::{DeductionLine, EarningLine, Payroll};
use crate::model::schedule::Shift;
use crate::payroll::reconcile::{AttendanceAnomaly, AttendanceStatus, ReconciledEntry};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lifeguard Payroll API",
        version = "1.0.0",
        description = r#"
## Lifeguard Staffing Payroll

Reconciles the monthly work schedule of pool staff against their recorded
attendance and turns the result into a payroll.

### 🔹 Key Features
- **Attendance Reconciliation**
  - Day-by-day status for every scheduled or recorded date
  - Anomalies (check-out before check-in, missing check-out) are flagged per day
- **Payroll Generation**
  - Hours worked × hourly rate, plus the role's base salary and extra earnings
  - Percentage deductions applied to the total earned
  - One payroll per employee and month
- **Recalculation**
  - Replace the monthly hours after a manual correction and recompute totals

### 🔐 Security
Every endpoint needs a **JWT Bearer** access token.
Generation and recalculation are limited to **Admin** and **Supervisor** roles;
staff can only read their own records.

### 📦 Response Format
- Monetary and hour values are decimal strings rounded to two places
- Errors are returned as `{"message": "..."}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::reconciled_attendance,

        crate::api::payroll::generate_payroll,
        crate::api::payroll::recalculate_payroll,
        crate::api::payroll::get_payrolls
    ),
    components(
        schemas(
            ReconciledQuery,
            ReconciledAttendanceResponse,
            ReconciledEntry,
            AttendanceStatus,
            AttendanceAnomaly,
            AttendanceRecord,
            Shift,
            GeneratePayroll,
            RecalculatePayroll,
            PayrollQuery,
            PayrollListResponse,
            Payroll,
            EarningLine,
            DeductionLine
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Schedule vs. attendance reconciliation"),
        (name = "Payroll", description = "Payroll generation and recalculation"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/payroll/generate"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/payroll/recalculate"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/payroll"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/attendance/reconciled"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
