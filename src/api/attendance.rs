use crate::auth::auth::AuthUser;
use crate::payroll::reconcile::ReconciledEntry;
use crate::payroll::service;
use crate::store::PayrollStore;
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ReconciledQuery {
    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = 7)]
    pub month: u32,

    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Serialize, ToSchema)]
pub struct ReconciledAttendanceResponse {
    pub employee_id: u64,
    pub month: u32,
    pub year: i32,

    /// Hours over present days only
    #[schema(example = "8.00", value_type = String)]
    pub total_hours: Decimal,

    pub entries: Vec<ReconciledEntry>,
}

/// Day-by-day comparison of a month's schedule against recorded attendance
#[utoipa::path(
    get,
    path = "/api/attendance/reconciled",
    params(ReconciledQuery),
    responses(
        (status = 200, description = "One entry per date with a shift or a record, ordered by date", body = ReconciledAttendanceResponse),
        (status = 400, description = "Invalid period", body = Object, example = json!({
            "message": "invalid month: 13/2026 is not a calendar month"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "employee not found (7)"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn reconciled_attendance(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    query: web::Query<ReconciledQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_access_to(query.employee_id)?;

    let today = Local::now().date_naive();
    let entries = service::reconcile_attendance(
        store.get_ref(),
        query.employee_id,
        query.month,
        query.year,
        today,
    )
    .await?;

    for anomaly in entries.iter().filter_map(ReconciledEntry::validation_error) {
        tracing::warn!(user_id = auth.user_id, error = %anomaly, "Attendance needs correction");
    }

    Ok(HttpResponse::Ok().json(ReconciledAttendanceResponse {
        employee_id: query.employee_id,
        month: query.month,
        year: query.year,
        total_hours: service::aggregate_hours(&entries),
        entries,
    }))
}
