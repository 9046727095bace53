use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
use tokio::time::sleep;

use super::HrmsApi;
use crate::directory::{Directory, SharedDirectory};
use crate::error::HrmsError;
use crate::join;
use crate::model::{Attendance, Employee, NewAttendance, NewEmployee, TodayStats};

/// Artificial response delay of the simulated backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub standard: Duration,
    pub stats: Duration,
}

impl Latency {
    pub fn none() -> Self {
        Self {
            standard: Duration::ZERO,
            stats: Duration::ZERO,
        }
    }

    /// Stats calls answer in half the standard time.
    pub fn from_millis(standard: u64) -> Self {
        Self {
            standard: Duration::from_millis(standard),
            stats: Duration::from_millis(standard / 2),
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_millis(600)
    }
}

/// Serves the [`HrmsApi`] contract from an in-process directory.
#[derive(Debug, Clone)]
pub struct SimulatedApi {
    directory: SharedDirectory,
    latency: Latency,
}

impl SimulatedApi {
    pub fn new(directory: SharedDirectory) -> Self {
        Self {
            directory,
            latency: Latency::default(),
        }
    }

    /// Demo employees and attendance with the default latency.
    pub fn seeded() -> Self {
        Self::new(Directory::seeded().into_shared())
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn directory(&self) -> &SharedDirectory {
        &self.directory
    }

    async fn delay(&self, duration: Duration) {
        if !duration.is_zero() {
            sleep(duration).await;
        }
    }
}

#[async_trait]
impl HrmsApi for SimulatedApi {
    async fn list_employees(&self) -> Result<Vec<Employee>, HrmsError> {
        self.delay(self.latency.standard).await;
        Ok(self.directory.read().await.employees().to_vec())
    }

    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, HrmsError> {
        self.delay(self.latency.standard).await;
        self.directory.write().await.create_employee(new)
    }

    async fn delete_employee(&self, id: &str) -> Result<(), HrmsError> {
        self.delay(self.latency.standard).await;
        self.directory.write().await.delete_employee(id);
        Ok(())
    }

    async fn list_raw_attendance(&self) -> Result<Vec<Attendance>, HrmsError> {
        self.delay(self.latency.standard).await;
        Ok(self.directory.read().await.attendance().to_vec())
    }

    async fn employee_attendance(&self, employee_id: &str) -> Result<Vec<Attendance>, HrmsError> {
        self.delay(self.latency.standard).await;
        Ok(self.directory.read().await.attendance_for(employee_id))
    }

    async fn create_attendance(&self, new: NewAttendance) -> Result<Attendance, HrmsError> {
        self.delay(self.latency.standard).await;
        self.directory.write().await.create_attendance(new)
    }

    async fn update_attendance(&self, id: &str, new: NewAttendance) -> Result<Attendance, HrmsError> {
        self.delay(self.latency.standard).await;
        self.directory.write().await.update_attendance(id, new)
    }

    async fn today_stats(&self) -> Result<TodayStats, HrmsError> {
        self.delay(self.latency.stats).await;
        let today = Local::now().date_naive();
        Ok(join::today_stats(self.directory.read().await.attendance(), today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttendanceStatus;
    use chrono::NaiveDate;

    fn api() -> SimulatedApi {
        SimulatedApi::seeded().with_latency(Latency::none())
    }

    #[tokio::test]
    async fn created_employee_is_listed_once() {
        let api = api();
        let created = api
            .create_employee(NewEmployee::new("EMP003", "Priya Nair", "priya@hrms.com", "Design"))
            .await
            .unwrap();

        let employees = api.list_employees().await.unwrap();
        let matching: Vec<_> = employees.iter().filter(|e| e.employee_id == "EMP003").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id, created.id);

        let again = api
            .create_employee(NewEmployee::new("EMP003", "Someone", "else@hrms.com", "Design"))
            .await;
        assert!(matches!(again, Err(HrmsError::DuplicateKey(_))));
    }

    #[tokio::test]
    async fn delete_twice_is_fine() {
        let api = api();
        api.delete_employee("2").await.unwrap();
        api.delete_employee("2").await.unwrap();

        let employees = api.list_employees().await.unwrap();
        assert!(employees.iter().all(|e| e.id != "2"));
    }

    #[tokio::test]
    async fn listing_joins_current_names() {
        let api = api();
        let records = api.list_attendance().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].employee_name, "Ajay Maurya");

        api.delete_employee("1").await.unwrap();
        let records = api.list_attendance().await.unwrap();
        assert_eq!(records[0].employee_name, "Unknown");
        assert_eq!(records[0].department, "N/A");
    }

    #[tokio::test]
    async fn today_stats_reflect_new_marks() {
        let api = api();
        let today = Local::now().date_naive();
        api.create_attendance(NewAttendance::new("1", today, AttendanceStatus::Present))
            .await
            .unwrap();
        api.create_attendance(NewAttendance::new("2", today, AttendanceStatus::Absent))
            .await
            .unwrap();

        let stats = api.today_stats().await.unwrap();
        assert_eq!(stats, TodayStats { present: 1, absent: 1 });
    }

    #[tokio::test]
    async fn employee_attendance_is_scoped() {
        let api = api();
        api.create_attendance(NewAttendance::new(
            "2",
            NaiveDate::from_ymd_opt(2024, 3, 21).unwrap(),
            AttendanceStatus::Present,
        ))
        .await
        .unwrap();

        let mine = api.employee_attendance("1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "ATT001");
    }

    #[tokio::test(start_paused = true)]
    async fn calls_wait_out_the_latency() {
        let api = SimulatedApi::seeded().with_latency(Latency::from_millis(600));
        let started = tokio::time::Instant::now();

        api.list_employees().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(600));

        let before_stats = tokio::time::Instant::now();
        api.today_stats().await.unwrap();
        let stats_wait = before_stats.elapsed();
        assert!(stats_wait >= Duration::from_millis(300));
        assert!(stats_wait < Duration::from_millis(600));
    }
}
