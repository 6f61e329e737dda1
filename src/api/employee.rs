use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    api::ErrorBody,
    error::AppError,
    model::employee::{Employee, EmployeeOverview, NewEmployee},
    service::HrService,
};

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(
    example = json!([{
        "employeeId": "EMP-001",
        "fullName": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "createdAt": "2024-01-01T09:30:00.000Z",
        "presentCount": 12,
        "attendanceCount": 15
    }])
)]
    pub data: Vec<EmployeeOverview>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeResponse {
    pub data: Employee,
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first, with attendance counts", body = EmployeeListResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Employee"
)]
pub async fn list_employees(service: web::Data<HrService>) -> Result<impl Responder, AppError> {
    let data = service.list_employees().await?;
    Ok(HttpResponse::Ok().json(EmployeeListResponse { data }))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = EmployeeResponse),
        (status = 400, description = "Missing or malformed fields", body = ErrorBody, example = json!({
            "error": "Missing required fields",
            "details": { "fields": ["email"] }
        })),
        (status = 409, description = "Employee id or email already in use", body = ErrorBody, example = json!({
            "error": "Duplicate employeeId",
            "details": { "field": "employeeId" }
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    service: web::Data<HrService>,
    payload: web::Json<NewEmployee>,
) -> Result<impl Responder, AppError> {
    let data = service.create_employee(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(EmployeeResponse { data }))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee and its attendance history deleted", body = EmployeeResponse),
        (status = 404, description = "Employee not found", body = ErrorBody, example = json!({
            "error": "Employee not found"
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    service: web::Data<HrService>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let data = service.delete_employee(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(EmployeeResponse { data }))
}
