use chrono::NaiveDate;
use sqlx::{MySql, mysql::MySqlArguments, query::QueryAs};

use crate::store::AttendanceFilter;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    String(String),
    Date(NaiveDate),
}

/// ===============================
/// SQL WHERE container
/// ===============================
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SqlFilter {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build WHERE clause for attendance
/// ===============================
pub fn build_attendance_filter(filter: &AttendanceFilter) -> SqlFilter {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(employee_id) = &filter.employee_id {
        conditions.push("employee_id = ?");
        values.push(SqlValue::String(employee_id.clone()));
    }

    if let Some(date) = filter.date {
        conditions.push("date = ?");
        values.push(SqlValue::Date(date));
    }

    if let Some(status) = filter.status {
        conditions.push("status = ?");
        values.push(SqlValue::String(status.to_string()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    SqlFilter { clause, values }
}

/// ===============================
/// Bind the filter values in order
/// ===============================
pub fn bind_values<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    #[test]
    fn empty_filter_has_no_where_clause() {
        assert_eq!(build_attendance_filter(&AttendanceFilter::default()), SqlFilter::default());
    }

    #[test]
    fn conditions_follow_binding_order() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let filter = AttendanceFilter::for_employee("E1")
            .on_date(Some(date))
            .with_status(AttendanceStatus::Absent);

        let sql = build_attendance_filter(&filter);
        assert_eq!(sql.clause, "WHERE employee_id = ? AND date = ? AND status = ?");
        assert_eq!(
            sql.values,
            vec![
                SqlValue::String("E1".into()),
                SqlValue::Date(date),
                SqlValue::String("Absent".into()),
            ]
        );
    }
}
