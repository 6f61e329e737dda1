use std::cmp::Reverse;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use super::{AttendanceFilter, ConflictField, Store, StoreError, StoreResult};
use crate::model::{attendance::AttendanceRecord, employee::Employee};

#[derive(Default)]
struct Tables {
    /// Insertion counter, breaks ties between equal timestamps.
    seq: u64,
    employees: Vec<(u64, Employee)>,
    attendance: Vec<(u64, AttendanceRecord)>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn has_employee(&self, employee_id: &str) -> bool {
        self.employees.iter().any(|(_, e)| e.employee_id == employee_id)
    }
}

/// Process-local store. Every uniqueness check runs under the same write lock
/// as the insert it guards.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StoreError::Unavailable("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.read().map(|_| ())
    }

    async fn close(&self) {}

    async fn insert_employee(&self, employee: &Employee) -> StoreResult<()> {
        let mut tables = self.write()?;

        if tables.has_employee(&employee.employee_id) {
            return Err(StoreError::Conflict(ConflictField::EmployeeId));
        }
        if tables.employees.iter().any(|(_, e)| e.email == employee.email) {
            return Err(StoreError::Conflict(ConflictField::Email));
        }

        let seq = tables.next_seq();
        tables.employees.push((seq, employee.clone()));
        debug!(employee_id = %employee.employee_id, "Employee stored");
        Ok(())
    }

    async fn find_employee(&self, employee_id: &str) -> StoreResult<Option<Employee>> {
        Ok(self
            .read()?
            .employees
            .iter()
            .find(|(_, e)| e.employee_id == employee_id)
            .map(|(_, e)| e.clone()))
    }

    async fn find_duplicate_employee(
        &self,
        employee_id: &str,
        email: &str,
    ) -> StoreResult<Option<Employee>> {
        let tables = self.read()?;
        let by_id = tables.employees.iter().find(|(_, e)| e.employee_id == employee_id);
        Ok(by_id
            .or_else(|| tables.employees.iter().find(|(_, e)| e.email == email))
            .map(|(_, e)| e.clone()))
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        let mut rows = self.read()?.employees.clone();
        rows.sort_by_key(|(seq, e)| Reverse((e.created_at, *seq)));
        Ok(rows.into_iter().map(|(_, e)| e).collect())
    }

    async fn count_employees(&self) -> StoreResult<u64> {
        Ok(self.read()?.employees.len() as u64)
    }

    async fn delete_employee(&self, employee_id: &str) -> StoreResult<bool> {
        let mut tables = self.write()?;
        let before = tables.employees.len();
        tables.employees.retain(|(_, e)| e.employee_id != employee_id);
        Ok(tables.employees.len() < before)
    }

    async fn insert_attendance(&self, record: &AttendanceRecord) -> StoreResult<u64> {
        let mut tables = self.write()?;

        if !tables.has_employee(&record.employee_id) {
            return Err(StoreError::MissingEmployee);
        }
        if tables
            .attendance
            .iter()
            .any(|(_, r)| r.employee_id == record.employee_id && r.date == record.date)
        {
            return Err(StoreError::Conflict(ConflictField::Date));
        }

        let seq = tables.next_seq();
        tables.attendance.push((seq, AttendanceRecord { id: seq, ..record.clone() }));
        debug!(employee_id = %record.employee_id, date = %record.date, id = seq, "Attendance stored");
        Ok(seq)
    }

    async fn find_attendance(&self, filter: &AttendanceFilter) -> StoreResult<Vec<AttendanceRecord>> {
        let mut rows: Vec<_> = self
            .read()?
            .attendance
            .iter()
            .filter(|(_, r)| filter.matches(r))
            .cloned()
            .collect();
        rows.sort_by_key(|(seq, r)| Reverse((r.date, r.created_at, *seq)));
        Ok(rows.into_iter().map(|(_, r)| r).collect())
    }

    async fn count_attendance(&self, filter: &AttendanceFilter) -> StoreResult<u64> {
        Ok(self
            .read()?
            .attendance
            .iter()
            .filter(|(_, r)| filter.matches(r))
            .count() as u64)
    }

    async fn delete_attendance(&self, employee_id: &str) -> StoreResult<u64> {
        let mut tables = self.write()?;
        let before = tables.attendance.len();
        tables.attendance.retain(|(_, r)| r.employee_id != employee_id);
        Ok((before - tables.attendance.len()) as u64)
    }

    async fn remove_employee_cascade(&self, employee_id: &str) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if !tables.has_employee(employee_id) {
            return Ok(false);
        }
        tables.employees.retain(|(_, e)| e.employee_id != employee_id);
        tables.attendance.retain(|(_, r)| r.employee_id != employee_id);
        Ok(true)
    }
}
