use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failures reported by the reconciliation and payroll operations.
///
/// None of them are retried here; a `Storage` error is the only kind a caller
/// may reasonably retry.
#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("{entity} not found ({key})")]
    NotFound { entity: &'static str, key: String },

    #[error("payroll already exists for employee {employee_id} in {month}/{year}")]
    Conflict {
        employee_id: u64,
        month: u32,
        year: i32,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl PayrollError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        PayrollError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        PayrollError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ResponseError for PayrollError {
    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::NotFound { .. } => StatusCode::NOT_FOUND,
            PayrollError::Conflict { .. } => StatusCode::CONFLICT,
            PayrollError::Validation { .. } => StatusCode::BAD_REQUEST,
            PayrollError::Configuration(_) | PayrollError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            PayrollError::Storage(e) => {
                tracing::error!(error = %e, "Storage failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_error_kinds_to_status_codes() {
        assert_eq!(
            PayrollError::not_found("employee", "7").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PayrollError::Conflict {
                employee_id: 7,
                month: 7,
                year: 2026
            }
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            PayrollError::validation("total_hours", "must not be negative").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PayrollError::Configuration("no template".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_carry_entity_and_key() {
        let err = PayrollError::not_found("work schedule", "employee 7, 7/2026");
        assert_eq!(err.to_string(), "work schedule not found (employee 7, 7/2026)");
    }
}
