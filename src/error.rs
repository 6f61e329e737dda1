use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use strum_macros::Display;
use thiserror::Error;
use tracing::error;

use crate::store::{ConflictField, StoreError};

/// Input fields the application layer names in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    EmployeeId,
    FullName,
    Email,
    Department,
    Date,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorDetails {
    /// Required inputs that were blank or absent.
    Fields(Vec<Field>),
    /// The single input that was present but malformed, or that collided.
    Field(Field),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<ErrorDetails>,
    },

    #[error("{message}")]
    Conflict { message: String, field: Field },

    #[error("{0}")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn missing(fields: Vec<Field>) -> Self {
        AppError::Validation {
            message: "Missing required fields".to_string(),
            details: Some(ErrorDetails::Fields(fields)),
        }
    }

    pub fn invalid(field: Field, message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: Some(ErrorDetails::Field(field)),
        }
    }

    pub fn employee_id_required() -> Self {
        AppError::Validation {
            message: "Employee ID is required".to_string(),
            details: None,
        }
    }

    pub fn duplicate(field: Field) -> Self {
        AppError::Conflict {
            message: format!("Duplicate {field}"),
            field,
        }
    }

    pub fn attendance_already_marked() -> Self {
        AppError::Conflict {
            message: "Attendance already marked for this date".to_string(),
            field: Field::Date,
        }
    }

    pub fn employee_not_found() -> Self {
        AppError::NotFound("Employee not found".to_string())
    }

    /// The single offending field, when the error names exactly one.
    #[cfg(test)]
    pub fn field(&self) -> Option<Field> {
        match self {
            AppError::Validation {
                details: Some(ErrorDetails::Field(field)),
                ..
            }
            | AppError::Conflict { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(ConflictField::Date) => AppError::attendance_already_marked(),
            StoreError::Conflict(conflict) => AppError::duplicate(conflict.into()),
            StoreError::MissingEmployee => AppError::employee_not_found(),
            StoreError::Unavailable(cause) => AppError::StorageUnavailable(cause),
        }
    }
}

impl From<ConflictField> for Field {
    fn from(conflict: ConflictField) -> Self {
        match conflict {
            ConflictField::EmployeeId => Field::EmployeeId,
            ConflictField::Email => Field::Email,
            ConflictField::Date => Field::Date,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation {
                message,
                details: Some(details),
            } => json!({ "error": message, "details": details }),
            AppError::Validation { message, .. } | AppError::NotFound(message) => {
                json!({ "error": message })
            }
            AppError::Conflict { message, field } => {
                json!({ "error": message, "details": { "field": field } })
            }
            AppError::StorageUnavailable(cause) => {
                error!(error = %cause, "Storage operation failed");
                json!({ "error": "Internal server error" })
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(err: AppError) -> serde_json::Value {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn missing_fields_are_listed() {
        let err = AppError::missing(vec![Field::EmployeeId, Field::FullName]);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_of(err).await,
            json!({
                "error": "Missing required fields",
                "details": { "fields": ["employeeId", "fullName"] }
            })
        );
    }

    #[actix_web::test]
    async fn conflict_names_the_field() {
        let err = AppError::from(StoreError::Conflict(ConflictField::Email));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            body_of(err).await,
            json!({ "error": "Duplicate email", "details": { "field": "email" } })
        );
    }

    #[actix_web::test]
    async fn storage_failures_do_not_leak_the_cause() {
        let err = AppError::StorageUnavailable("connection refused (os error 111)".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(err).await, json!({ "error": "Internal server error" }));
    }
}
