//! Persistence for employees and their attendance marks.
//!
//! The store is the final authority on uniqueness: employee id, employee
//! email and the `(employee id, date)` attendance pair are enforced at write
//! time. Anything the application layer checks beforehand only exists to
//! produce a friendlier error sooner.

pub mod memory;
pub mod mysql;

use async_trait::async_trait;
use chrono::NaiveDate;
use strum_macros::Display;
use thiserror::Error;

use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus},
    employee::Employee,
};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// The uniqueness constraint a write collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "camelCase")]
pub enum ConflictField {
    EmployeeId,
    Email,
    Date,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0}")]
    Conflict(ConflictField),

    /// An attendance write referenced an employee that is not stored.
    #[error("referenced employee does not exist")]
    MissingEmployee,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Narrows an attendance read or count. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub employee_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceFilter {
    pub fn for_employee(employee_id: &str) -> Self {
        Self {
            employee_id: Some(employee_id.to_string()),
            ..Self::default()
        }
    }

    pub fn on_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn with_status(mut self, status: AttendanceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_id
            .as_deref()
            .is_none_or(|id| id == record.employee_id)
            && self.date.is_none_or(|date| date == record.date)
            && self.status.is_none_or(|status| status == record.status)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used for readiness reporting.
    async fn ping(&self) -> StoreResult<()>;

    async fn close(&self);

    /// Fails with `Conflict(EmployeeId)` or `Conflict(Email)`. The email is
    /// expected to be lower-cased already.
    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()>;

    async fn find_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>>;

    /// An employee holding either the id or the email. A holder of the id is
    /// returned in preference to a different holder of the email.
    async fn find_duplicate_employee(
        &self,
        employee_id: &str,
        email: &str,
    ) -> StoreResult<Option<Employee>>;

    /// Most recently created first.
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;

    async fn count_employees(&self) -> StoreResult<u64>;

    /// Returns whether a row was removed.
    async fn delete_employee(&self, employee_id: &str) -> StoreResult<bool>;

    /// Fails with `Conflict(Date)` for a second mark on the same day and with
    /// `MissingEmployee` when the owner is gone. Returns the id the store
    /// assigned; `record.id` is ignored.
    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<u64>;

    /// Most recent date first.
    async fn find_attendance(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>>;

    async fn count_attendance(&self, filter: &AttendanceFilter) -> StoreResult<u64>;

    /// Returns how many records were removed.
    async fn delete_attendance(&self, employee_id: &str) -> StoreResult<u64>;

    /// Removes the employee and then every attendance record it owns.
    /// Returns `false` when there was no such employee.
    async fn remove_employee_cascade(&self, employee_id: &str) -> StoreResult<bool> {
        if !self.delete_employee(employee_id).await? {
            return Ok(false);
        }
        self.delete_attendance(employee_id).await?;
        Ok(true)
    }
}
