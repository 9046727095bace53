pub mod attendance;
pub mod department;
pub mod employee;
pub mod stats;

pub use attendance::{Attendance, AttendanceRecord, AttendanceStatus, NewAttendance, parse_day};
pub use department::Department;
pub use employee::{Employee, NewEmployee};
pub use stats::{DashboardStats, TodayStats};
