use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::ErrorBody,
    error::AppError,
    model::attendance::{AttendanceRecord, MarkedAttendance, NewAttendance},
    service::HrService,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceQuery {
    /// Only the record for this day (YYYY-MM-DD)
    #[param(example = "2024-01-01")]
    pub date: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct MarkedAttendanceResponse {
    pub data: MarkedAttendance,
}

/// List attendance for an employee
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/attendance",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        AttendanceQuery
    ),
    responses(
        (status = 200, description = "Attendance records, most recent date first", body = AttendanceListResponse),
        (status = 400, description = "Invalid date filter", body = ErrorBody, example = json!({
            "error": "Invalid date format (use YYYY-MM-DD)",
            "details": { "field": "date" }
        })),
        (status = 404, description = "Employee not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    service: web::Data<HrService>,
    path: web::Path<String>,
    query: web::Query<AttendanceQuery>,
) -> Result<impl Responder, AppError> {
    let data = service
        .list_attendance(&path.into_inner(), query.date.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(AttendanceListResponse { data }))
}

/// Mark attendance for a day
#[utoipa::path(
    post,
    path = "/api/employees/{employee_id}/attendance",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    request_body = NewAttendance,
    responses(
        (status = 201, description = "Attendance marked", body = MarkedAttendanceResponse),
        (status = 400, description = "Missing or malformed date/status", body = ErrorBody, example = json!({
            "error": "Status must be Present or Absent",
            "details": { "field": "status" }
        })),
        (status = 404, description = "Employee not found", body = ErrorBody),
        (status = 409, description = "Already marked for this date", body = ErrorBody, example = json!({
            "error": "Attendance already marked for this date",
            "details": { "field": "date" }
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    service: web::Data<HrService>,
    path: web::Path<String>,
    payload: web::Json<NewAttendance>,
) -> Result<impl Responder, AppError> {
    let data = service
        .mark_attendance(&path.into_inner(), payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(MarkedAttendanceResponse { data }))
}
