use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "employeeId": "EMP-001",
        "fullName": "John Doe",
        "email": "john.doe@company.com",
        "department": "Engineering",
        "createdAt": "2024-01-01T09:30:00.000Z"
    })
)]
pub struct Employee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    /// Always stored lower-cased.
    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[serde(with = "crate::utils::time::iso_millis")]
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// An employee together with the counts derived from its attendance history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOverview {
    #[serde(flatten)]
    pub employee: Employee,

    #[schema(example = 12)]
    pub present_count: u64,

    #[schema(example = 15)]
    pub attendance_count: u64,
}

/// Create-employee input as received. Non-string values arrive as `None`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[serde(default, deserialize_with = "crate::utils::validators::string_only")]
    #[schema(example = "EMP-001", value_type = String)]
    pub employee_id: Option<String>,

    #[serde(default, deserialize_with = "crate::utils::validators::string_only")]
    #[schema(example = "John Doe", value_type = String)]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "crate::utils::validators::string_only")]
    #[schema(example = "john@company.com", format = "email", value_type = String)]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "crate::utils::validators::string_only")]
    #[schema(example = "Engineering", value_type = String)]
    pub department: Option<String>,
}
