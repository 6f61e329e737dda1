use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, AsRefStr,
    ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Assigned by the store when the record is written.
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[serde(with = "crate::utils::time::iso_millis")]
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
}

/// What a successful mark-attendance call hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkedAttendance {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,
}

impl From<AttendanceRecord> for MarkedAttendance {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            employee_id: record.employee_id,
            date: record.date,
            status: record.status,
        }
    }
}

/// Mark-attendance input as received. Non-string values arrive as `None`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewAttendance {
    #[serde(default, deserialize_with = "crate::utils::validators::string_only")]
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "crate::utils::validators::string_only")]
    #[schema(example = "Present", value_type = String)]
    pub status: Option<String>,
}
