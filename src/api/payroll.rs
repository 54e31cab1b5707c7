use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::model::payroll::Payroll;
use crate::payroll::{PayrollError, hours::parse_hours_override, service};
use crate::store::PayrollStore;

#[derive(Deserialize, ToSchema)]
pub struct GeneratePayroll {
    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = 7)]
    pub month: u32,

    #[schema(example = 2026)]
    pub year: i32,
}

#[derive(Deserialize, ToSchema)]
pub struct RecalculatePayroll {
    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = 7)]
    pub month: u32,

    #[schema(example = 2026)]
    pub year: i32,

    /// Corrected monthly total; a JSON number or a numeric string.
    #[schema(example = 150, value_type = Object)]
    pub total_hours: Value,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayrollQuery {
    #[schema(example = 7)]
    pub employee_id: u64,

    /// Together with `year`, selects a single payroll
    #[schema(example = 7)]
    pub month: Option<u32>,

    #[schema(example = 2026)]
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct PayrollListResponse {
    pub data: Vec<Payroll>,
    #[schema(example = 2)]
    pub total: usize,
}

#[utoipa::path(
    post,
    path = "/api/payroll/generate",
    request_body = GeneratePayroll,
    responses(
        (status = 201, description = "Payroll generated", body = Payroll),
        (status = 400, description = "Invalid period", body = Object, example = json!({
            "message": "invalid month: 13/2026 is not a calendar month"
        })),
        (status = 404, description = "Employee or work schedule not found", body = Object, example = json!({
            "message": "work schedule not found (employee 7, 7/2026)"
        })),
        (status = 409, description = "Payroll already generated for this month", body = Object, example = json!({
            "message": "payroll already exists for employee 7 in 7/2026"
        })),
        (status = 500, description = "Role has no salary template, or storage failure"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payroll(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    payload: web::Json<GeneratePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let today = Local::now().date_naive();
    let payroll = service::generate_payroll(
        store.get_ref(),
        payload.employee_id,
        payload.month,
        payload.year,
        today,
    )
    .await?;

    info!(
        user_id = auth.user_id,
        username = %auth.username,
        payroll_id = payroll.id,
        "Payroll generation requested"
    );

    Ok(HttpResponse::Created().json(payroll))
}

#[utoipa::path(
    put,
    path = "/api/payroll/recalculate",
    request_body = RecalculatePayroll,
    responses(
        (status = 200, description = "Payroll recalculated", body = Payroll),
        (status = 400, description = "Override is not a non-negative number", body = Object, example = json!({
            "message": "invalid total_hours: must not be negative"
        })),
        (status = 404, description = "No payroll generated for this month yet"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn recalculate_payroll(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    payload: web::Json<RecalculatePayroll>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor_or_admin()?;

    let hours = parse_hours_override(&payload.total_hours)?;
    let payroll = service::recalculate_payroll(
        store.get_ref(),
        payload.employee_id,
        payload.month,
        payload.year,
        hours,
    )
    .await?;

    info!(
        user_id = auth.user_id,
        username = %auth.username,
        payroll_id = payroll.id,
        "Payroll hours overridden"
    );

    Ok(HttpResponse::Ok().json(payroll))
}

#[utoipa::path(
    get,
    path = "/api/payroll",
    params(PayrollQuery),
    responses(
        (status = 200, description = "A single payroll when month and year are given, otherwise the employee's payrolls newest first", body = PayrollListResponse),
        (status = 400, description = "Only one of month/year given"),
        (status = 404, description = "Payroll or employee not found"),
        (status = 401),
        (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payrolls(
    auth: AuthUser,
    store: web::Data<dyn PayrollStore>,
    query: web::Query<PayrollQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_access_to(query.employee_id)?;

    match (query.month, query.year) {
        (Some(month), Some(year)) => {
            let payroll =
                service::get_payroll(store.get_ref(), query.employee_id, month, year).await?;
            Ok(HttpResponse::Ok().json(payroll))
        }
        (None, None) => {
            let data = service::list_payrolls(store.get_ref(), query.employee_id).await?;
            Ok(HttpResponse::Ok().json(PayrollListResponse {
                total: data.len(),
                data,
            }))
        }
        _ => Err(
            PayrollError::validation("period", "month and year must be given together").into(),
        ),
    }
}
