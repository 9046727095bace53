//! Remote access layer.
//!
//! [`HrmsApi`] is the request/response contract the stores talk to. Two
//! implementations exist: [`SimulatedApi`] answers from an in-process
//! [`Directory`](crate::directory::Directory) after an artificial delay, and
//! [`HttpApi`] calls the REST service. Neither keeps state of its own
//! between calls.

use async_trait::async_trait;
use chrono::Local;

use crate::error::HrmsError;
use crate::join;
use crate::model::{Attendance, AttendanceRecord, Employee, NewAttendance, NewEmployee, TodayStats};

mod http;
mod simulated;

pub use http::{DEFAULT_BASE_URL, HttpApi};
pub use simulated::{Latency, SimulatedApi};

#[async_trait]
pub trait HrmsApi: Send + Sync {
    /// Whole employee collection, in no particular order.
    async fn list_employees(&self) -> Result<Vec<Employee>, HrmsError>;

    /// Fails with [`HrmsError::DuplicateKey`] when the business key is taken.
    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, HrmsError>;

    /// Succeeds whether or not the employee exists.
    async fn delete_employee(&self, id: &str) -> Result<(), HrmsError>;

    async fn list_raw_attendance(&self) -> Result<Vec<Attendance>, HrmsError>;

    /// One employee's attendance, newest date first.
    async fn employee_attendance(&self, employee_id: &str) -> Result<Vec<Attendance>, HrmsError>;

    async fn create_attendance(&self, new: NewAttendance) -> Result<Attendance, HrmsError>;

    async fn update_attendance(&self, id: &str, new: NewAttendance) -> Result<Attendance, HrmsError>;

    /// Attendance joined with the employee collection as it is right now.
    async fn list_attendance(&self) -> Result<Vec<AttendanceRecord>, HrmsError> {
        let (attendance, employees) =
            futures::try_join!(self.list_raw_attendance(), self.list_employees())?;
        Ok(join::enrich(&attendance, &employees))
    }

    /// Present/absent counts for the local calendar day.
    async fn today_stats(&self) -> Result<TodayStats, HrmsError> {
        let today = Local::now().date_naive();
        let attendance = self.list_raw_attendance().await?;
        Ok(join::today_stats(&attendance, today))
    }
}
