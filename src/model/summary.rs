use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[schema(example = 3)]
    pub total_employees: u64,
    #[schema(example = 5)]
    pub total_attendance: u64,
    #[schema(example = 3)]
    pub total_present: u64,
    #[schema(example = 2)]
    pub total_absent: u64,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub today_date: NaiveDate,
    #[schema(example = 1)]
    pub today_present: u64,
    #[schema(example = 0)]
    pub today_absent: u64,
}
