use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::HrmsError;
use crate::model::{Attendance, AttendanceStatus, Department, Employee, NewAttendance, NewEmployee};

pub type SharedDirectory = Arc<RwLock<Directory>>;

/// Authoritative in-memory collections.
///
/// Enforces the business-key uniqueness of employees, the one record per
/// (employee, day) rule for attendance and the attendance -> employee
/// reference at creation time. Deleting an employee leaves their attendance
/// in place; readers show it with placeholder names.
#[derive(Debug, Default)]
pub struct Directory {
    employees: Vec<Employee>,
    attendance: Vec<Attendance>,
    attendance_seq: u64,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two employees and one historical attendance mark, handy for demos.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let employees = vec![
            Employee {
                id: "1".into(),
                employee_id: "EMP001".into(),
                full_name: "Ajay Maurya".into(),
                email: "ajay@hrms.com".into(),
                department: Department::Engineering.to_string(),
                created_at: now,
                updated_at: now,
            },
            Employee {
                id: "2".into(),
                employee_id: "EMP002".into(),
                full_name: "Jane Smith".into(),
                email: "jane.smith@hrms.com".into(),
                department: Department::HumanResources.to_string(),
                created_at: now,
                updated_at: now,
            },
        ];
        let attendance = vec![Attendance {
            id: "ATT001".into(),
            employee_id: "1".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap_or_default(),
            status: AttendanceStatus::Present,
            created_at: now,
            updated_at: now,
        }];

        Self {
            employees,
            attendance_seq: attendance.len() as u64,
            attendance,
        }
    }

    pub fn into_shared(self) -> SharedDirectory {
        Arc::new(RwLock::new(self))
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn attendance(&self) -> &[Attendance] {
        &self.attendance
    }

    pub fn find_employee(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    pub fn create_employee(&mut self, new: NewEmployee) -> Result<Employee, HrmsError> {
        new.validate()?;

        let taken = self.employees.iter().any(|e| {
            e.employee_id == new.employee_id || e.email.eq_ignore_ascii_case(&new.email)
        });
        if taken {
            return Err(HrmsError::duplicate_employee());
        }

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            employee_id: new.employee_id,
            full_name: new.full_name,
            email: new.email,
            department: new.department,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %employee.id, employee_id = %employee.employee_id, "Employee created");

        self.employees.push(employee.clone());
        Ok(employee)
    }

    /// Removes the employee with internal id `id`, if present.
    pub fn delete_employee(&mut self, id: &str) -> Option<Employee> {
        let position = self.employees.iter().position(|e| e.id == id)?;
        Some(self.employees.remove(position))
    }

    /// One employee's attendance, newest date first.
    pub fn attendance_for(&self, employee_id: &str) -> Vec<Attendance> {
        let mut records: Vec<_> = self
            .attendance
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    pub fn create_attendance(&mut self, new: NewAttendance) -> Result<Attendance, HrmsError> {
        new.validate()?;

        if self.marked_on(&new.employee_id, new.date, None) {
            return Err(HrmsError::duplicate_attendance());
        }
        if self.find_employee(&new.employee_id).is_none() {
            return Err(HrmsError::unknown_employee());
        }

        self.attendance_seq += 1;
        let now = Utc::now();
        let record = Attendance {
            id: format!("ATT{:03}", self.attendance_seq),
            employee_id: new.employee_id,
            date: new.date,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %record.id, employee_id = %record.employee_id, date = %record.date, "Attendance marked");

        self.attendance.push(record.clone());
        Ok(record)
    }

    /// Changes date and status of an existing record. The record keeps its
    /// employee; `new.employee_id` is ignored.
    pub fn update_attendance(&mut self, id: &str, new: NewAttendance) -> Result<Attendance, HrmsError> {
        let employee_id = self
            .attendance
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.employee_id.clone())
            .ok_or_else(HrmsError::attendance_not_found)?;

        if self.marked_on(&employee_id, new.date, Some(id)) {
            return Err(HrmsError::duplicate_attendance());
        }

        let record = self
            .attendance
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(HrmsError::attendance_not_found)?;
        record.date = new.date;
        record.status = new.status;
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    fn marked_on(&self, employee_id: &str, date: NaiveDate, except: Option<&str>) -> bool {
        self.attendance.iter().any(|a| {
            a.employee_id == employee_id && a.date == date && Some(a.id.as_str()) != except
        })
    }
}
