use crate::api::{
    ErrorBody,
    attendance::{AttendanceListResponse, MarkedAttendanceResponse},
    employee::{EmployeeListResponse, EmployeeResponse},
    summary::SummaryResponse,
};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, MarkedAttendance, NewAttendance},
    employee::{Employee, EmployeeOverview, NewEmployee},
    summary::Summary,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

A small **Human Resource Management** record keeper: employee profiles and
one attendance mark per employee per day.

### 🔹 Key Features
- **Employee Management**
  - Create, list and delete employees (deleting removes their attendance too)
- **Attendance Management**
  - Mark a day as `Present` or `Absent`, list history, filter by date
- **Summary**
  - Headcount and attendance totals, overall and for today (UTC)

### 📦 Response Format
- Success: `{ "data": ... }`
- Failure: `{ "error": "...", "details": { "field": "..." } }`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::mark_attendance,

        crate::api::summary::summary
    ),
    components(
        schemas(
            ErrorBody,
            Employee,
            EmployeeOverview,
            NewEmployee,
            EmployeeListResponse,
            EmployeeResponse,
            AttendanceStatus,
            AttendanceRecord,
            MarkedAttendance,
            NewAttendance,
            AttendanceListResponse,
            MarkedAttendanceResponse,
            Summary,
            SummaryResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Summary", description = "Dashboard totals"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/ready",
            "/api/employees",
            "/api/employees/{employee_id}",
            "/api/employees/{employee_id}/attendance",
            "/api/summary",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
