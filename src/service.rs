use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, AppResult, Field};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, MarkedAttendance, NewAttendance},
    employee::{Employee, EmployeeOverview, NewEmployee},
    summary::Summary,
};
use crate::store::{AttendanceFilter, Store};
use crate::utils::{
    time,
    validators::{is_valid_email, normalize_status, parse_date, trim_string},
};

/// Employee and attendance operations over an explicitly passed store handle.
#[derive(Clone)]
pub struct HrService {
    store: Arc<dyn Store>,
}

impl HrService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn ready(&self) -> AppResult<()> {
        self.store.ping().await.map_err(AppError::from)
    }

    #[instrument(name = "create_employee", skip(self, input))]
    pub async fn create_employee(&self, input: NewEmployee) -> AppResult<Employee> {
        let employee_id = trim_string(input.employee_id.as_deref());
        let full_name = trim_string(input.full_name.as_deref());
        let email = trim_string(input.email.as_deref()).to_lowercase();
        let department = trim_string(input.department.as_deref());

        let missing: Vec<Field> = [
            (Field::EmployeeId, &employee_id),
            (Field::FullName, &full_name),
            (Field::Email, &email),
            (Field::Department, &department),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field)
        .collect();

        if !missing.is_empty() {
            return Err(AppError::missing(missing));
        }

        if !is_valid_email(&email) {
            return Err(AppError::invalid(Field::Email, "Invalid email format"));
        }

        if let Some(existing) = self
            .store
            .find_duplicate_employee(&employee_id, &email)
            .await?
        {
            let field = if existing.employee_id == employee_id {
                Field::EmployeeId
            } else {
                Field::Email
            };
            warn!(%employee_id, %field, "Duplicate employee rejected");
            return Err(AppError::duplicate(field));
        }

        let employee = Employee {
            employee_id,
            full_name,
            email,
            department,
            created_at: time::now(),
        };

        // A racing insert that slipped past the lookup surfaces here as a conflict.
        self.store.insert_employee(&employee).await?;

        info!(employee_id = %employee.employee_id, "Employee created");
        Ok(employee)
    }

    pub async fn list_employees(&self) -> AppResult<Vec<EmployeeOverview>> {
        let employees = self.store.list_employees().await?;
        let mut overviews = Vec::with_capacity(employees.len());

        for employee in employees {
            let records = self
                .store
                .find_attendance(&AttendanceFilter::for_employee(&employee.employee_id))
                .await?;
            let present_count = records
                .iter()
                .filter(|r| r.status == AttendanceStatus::Present)
                .count() as u64;

            overviews.push(EmployeeOverview {
                employee,
                present_count,
                attendance_count: records.len() as u64,
            });
        }

        debug!(count = overviews.len(), "Listed employees");
        Ok(overviews)
    }

    #[instrument(name = "delete_employee", skip(self))]
    pub async fn delete_employee(&self, employee_id: &str) -> AppResult<Employee> {
        let employee_id = self.require_employee_id(employee_id)?;

        let existing = self
            .store
            .find_employee(&employee_id)
            .await?
            .ok_or_else(AppError::employee_not_found)?;

        if !self.store.remove_employee_cascade(&employee_id).await? {
            return Err(AppError::employee_not_found());
        }

        info!(%employee_id, "Employee deleted with attendance history");
        Ok(existing)
    }

    pub async fn list_attendance(
        &self,
        employee_id: &str,
        date: Option<&str>,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let employee_id = self.require_employee_id(employee_id)?;
        self.require_employee(&employee_id).await?;

        let date_filter = trim_string(date);
        let date = if date_filter.is_empty() {
            None
        } else {
            Some(parse_date(&date_filter).ok_or_else(invalid_date)?)
        };

        let records = self
            .store
            .find_attendance(&AttendanceFilter::for_employee(&employee_id).on_date(date))
            .await?;
        Ok(records)
    }

    /// Input is checked before the employee lookup, so a malformed date is
    /// reported as such whether or not the employee exists.
    #[instrument(name = "mark_attendance", skip(self, input))]
    pub async fn mark_attendance(
        &self,
        employee_id: &str,
        input: NewAttendance,
    ) -> AppResult<MarkedAttendance> {
        let employee_id = self.require_employee_id(employee_id)?;

        let raw_date = trim_string(input.date.as_deref());
        let raw_status = trim_string(input.status.as_deref());

        let mut missing = Vec::new();
        if raw_date.is_empty() {
            missing.push(Field::Date);
        }
        if raw_status.is_empty() {
            missing.push(Field::Status);
        }
        if !missing.is_empty() {
            return Err(AppError::missing(missing));
        }

        let date = parse_date(&raw_date).ok_or_else(invalid_date)?;
        let status = normalize_status(Some(&raw_status)).ok_or_else(|| {
            AppError::invalid(Field::Status, "Status must be Present or Absent")
        })?;

        self.require_employee(&employee_id).await?;

        let filter = AttendanceFilter::for_employee(&employee_id).on_date(Some(date));
        if self.store.count_attendance(&filter).await? > 0 {
            warn!(%employee_id, %date, "Attendance already marked");
            return Err(AppError::attendance_already_marked());
        }

        let mut record = AttendanceRecord {
            id: 0,
            employee_id,
            date,
            status,
            created_at: time::now(),
        };
        record.id = self.store.insert_attendance(&record).await?;

        info!(employee_id = %record.employee_id, %date, %status, id = record.id, "Attendance marked");
        Ok(record.into())
    }

    pub async fn summary(&self) -> AppResult<Summary> {
        self.summary_at(Utc::now()).await
    }

    /// Counts as of `now`; "today" is the UTC date of `now`.
    pub async fn summary_at(&self, now: DateTime<Utc>) -> AppResult<Summary> {
        let today = time::today(now);
        let all = AttendanceFilter::default();
        let today_only = all.clone().on_date(Some(today));

        Ok(Summary {
            total_employees: self.store.count_employees().await?,
            total_attendance: self.store.count_attendance(&all).await?,
            total_present: self
                .store
                .count_attendance(&all.clone().with_status(AttendanceStatus::Present))
                .await?,
            total_absent: self
                .store
                .count_attendance(&all.with_status(AttendanceStatus::Absent))
                .await?,
            today_date: today,
            today_present: self
                .store
                .count_attendance(&today_only.clone().with_status(AttendanceStatus::Present))
                .await?,
            today_absent: self
                .store
                .count_attendance(&today_only.with_status(AttendanceStatus::Absent))
                .await?,
        })
    }

    fn require_employee_id(&self, employee_id: &str) -> AppResult<String> {
        let employee_id = trim_string(Some(employee_id));
        if employee_id.is_empty() {
            return Err(AppError::employee_id_required());
        }
        Ok(employee_id)
    }

    async fn require_employee(&self, employee_id: &str) -> AppResult<Employee> {
        self.store
            .find_employee(employee_id)
            .await?
            .ok_or_else(AppError::employee_not_found)
    }
}

fn invalid_date() -> AppError {
    AppError::invalid(Field::Date, "Invalid date format (use YYYY-MM-DD)")
}
