use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::{debug, error, warn};

use super::{AttendanceFilter, ConflictField, Store, StoreError, StoreResult};
use crate::model::{attendance::AttendanceRecord, employee::Employee};
use crate::utils::db_utils::{bind_values, build_attendance_filter};

const SCHEMA: [&str; 2] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
        employee_id VARCHAR(64) COLLATE utf8mb4_bin NOT NULL,
        full_name VARCHAR(255) NOT NULL,
        email VARCHAR(255) COLLATE utf8mb4_bin NOT NULL,
        department VARCHAR(255) NOT NULL,
        created_at TIMESTAMP(3) NOT NULL,
        PRIMARY KEY (id),
        UNIQUE KEY uq_employees_employee_id (employee_id),
        UNIQUE KEY uq_employees_email (email)
    ) DEFAULT CHARSET = utf8mb4
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS attendance (
        id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
        employee_id VARCHAR(64) COLLATE utf8mb4_bin NOT NULL,
        date DATE NOT NULL,
        status VARCHAR(16) NOT NULL,
        created_at TIMESTAMP(3) NOT NULL,
        PRIMARY KEY (id),
        UNIQUE KEY uq_attendance_employee_date (employee_id, date),
        KEY idx_attendance_date (date)
    ) DEFAULT CHARSET = utf8mb4
    "#,
];

const EMPLOYEE_COLUMNS: &str = "employee_id, full_name, email, department, created_at";

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: String,
    date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|_| {
            StoreError::Unavailable(format!("unrecognized attendance status {:?}", row.status))
        })?;

        Ok(AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            status,
            created_at: row.created_at,
        })
    }
}

/// Reads the key name out of `Duplicate entry '<value>' for key '<key>'`.
/// Only the text after the last `for key '` is consulted, since the value
/// itself is user input.
fn conflict_field_for(message: &str) -> Option<ConflictField> {
    let (_, key) = message.rsplit_once("for key '")?;
    let key = key.trim_end_matches('\'');
    // MySQL 8 qualifies the key with its table name.
    let key = key.rsplit_once('.').map_or(key, |(_, name)| name);

    match key {
        "uq_employees_employee_id" => Some(ConflictField::EmployeeId),
        "uq_employees_email" => Some(ConflictField::Email),
        "uq_attendance_employee_date" => Some(ConflictField::Date),
        _ => None,
    }
}

/// Duplicate-key errors become `Conflict` on the key that fired; everything
/// else means the backend could not serve the call.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23000") {
            if let Some(field) = conflict_field_for(db_err.message()) {
                return StoreError::Conflict(field);
            }
        }
    }

    error!(error = %err, "MySQL operation failed");
    StoreError::Unavailable(err.to_string())
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn bootstrap_schema(&self) -> StoreResult<()> {
        for ddl in SCHEMA {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        debug!("Schema ready");
        Ok(())
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx_error)
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (employee_id, full_name, email, department, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(&employee.email)
        .bind(&employee.department)
        .bind(employee.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ?");
        sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_duplicate_employee(
        &self,
        employee_id: &str,
        email: &str,
    ) -> StoreResult<Option<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ? OR email = ? \
             ORDER BY employee_id = ? DESC LIMIT 1"
        );
        sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .bind(email)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn count_employees(&self) -> StoreResult<u64> {
        let (total,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(total as u64)
    }

    async fn delete_employee(&self, employee_id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<u64> {
        // The SELECT guards against writing for an employee deleted in the meantime.
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status, created_at)
            SELECT employee_id, ?, ?, ? FROM employees WHERE employee_id = ?
            "#,
        )
        .bind(record.date)
        .bind(record.status.as_ref())
        .bind(record.created_at)
        .bind(&record.employee_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            warn!(employee_id = %record.employee_id, "Attendance insert found no employee");
            return Err(StoreError::MissingEmployee);
        }
        Ok(result.last_insert_id())
    }

    async fn find_attendance(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        let sql_filter = build_attendance_filter(filter);
        let sql = format!(
            "SELECT id, employee_id, date, status, created_at FROM attendance {} ORDER BY date DESC, created_at DESC, id DESC",
            sql_filter.clause
        );
        debug!(sql = %sql, bindings = ?sql_filter.values, "Fetching attendance");

        let rows = bind_values(sqlx::query_as::<_, AttendanceRow>(&sql), sql_filter.values)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn count_attendance(&self, filter: &AttendanceFilter) -> StoreResult<u64> {
        let sql_filter = build_attendance_filter(filter);
        let sql = format!("SELECT COUNT(*) FROM attendance {}", sql_filter.clause);
        debug!(sql = %sql, bindings = ?sql_filter.values, "Counting attendance");

        let (total,) = bind_values(sqlx::query_as::<_, (i64,)>(&sql), sql_filter.values)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(total as u64)
    }

    async fn delete_attendance(&self, employee_id: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn remove_employee_cascade(&self, employee_id: &str) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let removed = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await.map_err(map_sqlx_error)?;
            return Ok(false);
        }

        let records = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(employee_id, records, "Employee removed with attendance");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug, thiserror::Error)]
    #[error("{message}")]
    struct DuplicateEntry {
        message: String,
    }

    impl DatabaseError for DuplicateEntry {
        fn message(&self) -> &str {
            &self.message
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23000"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    fn duplicate(value: &str, key: &str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(DuplicateEntry {
            message: format!("Duplicate entry '{value}' for key '{key}'"),
        }))
    }

    #[test]
    fn duplicate_keys_map_to_their_field() {
        for (key, field) in [
            ("employees.uq_employees_employee_id", ConflictField::EmployeeId),
            ("employees.uq_employees_email", ConflictField::Email),
            ("attendance.uq_attendance_employee_date", ConflictField::Date),
            ("uq_employees_email", ConflictField::Email),
        ] {
            match map_sqlx_error(duplicate("x", key)) {
                StoreError::Conflict(mapped) => assert_eq!(mapped, field, "key {key}"),
                other => panic!("{key} mapped to {other:?}"),
            }
        }
    }

    #[test]
    fn duplicate_value_cannot_name_another_key() {
        let err = duplicate(
            "uq_employees_email-2024-01-01",
            "attendance.uq_attendance_employee_date",
        );
        assert!(matches!(
            map_sqlx_error(err),
            StoreError::Conflict(ConflictField::Date)
        ));

        let err = duplicate("uq_employees_employee_id", "employees.uq_employees_email");
        assert!(matches!(
            map_sqlx_error(err),
            StoreError::Conflict(ConflictField::Email)
        ));
    }

    #[test]
    fn unknown_keys_and_other_errors_are_unavailable() {
        assert!(matches!(
            map_sqlx_error(duplicate("x", "employees.PRIMARY")),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn email_and_employee_id_compare_byte_for_byte() {
        let employees = SCHEMA[0];
        assert!(employees.contains("employee_id VARCHAR(64) COLLATE utf8mb4_bin NOT NULL"));
        assert!(employees.contains("email VARCHAR(255) COLLATE utf8mb4_bin NOT NULL"));
        assert!(SCHEMA[1].contains("employee_id VARCHAR(64) COLLATE utf8mb4_bin NOT NULL"));
    }
}
