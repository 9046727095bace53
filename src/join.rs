//! Derived views over the employee and attendance collections.
//!
//! Everything here is a pure function of the snapshots passed in. Callers
//! recompute after every change instead of caching results, so a derived
//! row can never carry an employee name that has since changed.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::model::{
    Attendance, AttendanceRecord, AttendanceStatus, Employee, TodayStats,
};

pub const UNKNOWN_EMPLOYEE_NAME: &str = "Unknown";
pub const UNKNOWN_DEPARTMENT: &str = "N/A";

/// Rows shown on the dashboard's recent activity list.
pub const RECENT_LIMIT: usize = 8;

/// Attaches employee name and department to each attendance record.
///
/// The lookup key is `Employee::id` (internal id). Records whose employee
/// cannot be found get placeholder values. Input order is preserved.
pub fn enrich(attendance: &[Attendance], employees: &[Employee]) -> Vec<AttendanceRecord> {
    let by_id: HashMap<&str, &Employee> =
        employees.iter().map(|e| (e.id.as_str(), e)).collect();

    attendance
        .iter()
        .map(|a| {
            let employee = by_id.get(a.employee_id.as_str());
            AttendanceRecord {
                attendance: a.clone(),
                employee_name: employee
                    .map(|e| e.full_name.clone())
                    .unwrap_or_else(|| UNKNOWN_EMPLOYEE_NAME.to_string()),
                department: employee
                    .map(|e| e.department.clone())
                    .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string()),
            }
        })
        .collect()
}

/// Records marked on `day`, keyed by employee id.
pub fn today_index(records: &[AttendanceRecord], day: NaiveDate) -> HashMap<&str, &AttendanceRecord> {
    records
        .iter()
        .filter(|r| r.date() == day)
        .map(|r| (r.employee_id(), r))
        .collect()
}

pub fn today_stats(records: &[Attendance], day: NaiveDate) -> TodayStats {
    records
        .iter()
        .filter(|a| a.date == day)
        .fold(TodayStats::default(), |mut stats, a| {
            match a.status {
                AttendanceStatus::Present => stats.present += 1,
                AttendanceStatus::Absent => stats.absent += 1,
            }
            stats
        })
}

/// Directory search box + department dropdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub department: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&employee.full_name, &employee.email, &employee.employee_id]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
        };
        let matches_department = self
            .department
            .as_deref()
            .is_none_or(|d| employee.department == d);

        matches_search && matches_department
    }

    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        employees.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Attendance table filters. Results come back newest date first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.date.is_none_or(|d| record.date() == d)
            && self.status.is_none_or(|s| record.status() == s)
    }

    pub fn apply<'a>(&self, records: &'a [AttendanceRecord]) -> Vec<&'a AttendanceRecord> {
        let mut hits: Vec<_> = records.iter().filter(|r| self.matches(r)).collect();
        hits.sort_by(|a, b| b.date().cmp(&a.date()));
        hits
    }
}

/// The `limit` most recent records by date.
pub fn recent(records: &[AttendanceRecord], limit: usize) -> Vec<&AttendanceRecord> {
    let mut sorted: Vec<_> = records.iter().collect();
    sorted.sort_by(|a, b| b.date().cmp(&a.date()));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn employee(id: &str, code: &str, name: &str, department: &str) -> Employee {
        let now = Utc::now();
        Employee {
            id: id.into(),
            employee_id: code.into(),
            full_name: name.into(),
            email: format!("{}@hrms.com", name.to_lowercase().replace(' ', ".")),
            department: department.into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn mark(id: &str, employee_id: &str, date: &str, status: AttendanceStatus) -> Attendance {
        let now = Utc::now();
        Attendance {
            id: id.into(),
            employee_id: employee_id.into(),
            date: day(date),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn enrich_joins_on_internal_id() {
        let employees = vec![employee("1", "EMP001", "Alice", "Engineering")];
        let attendance = vec![mark("A1", "1", "2024-03-20", AttendanceStatus::Present)];

        let rows = enrich(&attendance, &employees);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_name, "Alice");
        assert_eq!(rows[0].department, "Engineering");
    }

    #[test]
    fn enrich_never_matches_on_business_key() {
        let employees = vec![employee("1", "EMP001", "Alice", "Engineering")];
        let attendance = vec![mark("A1", "EMP001", "2024-03-20", AttendanceStatus::Present)];

        let rows = enrich(&attendance, &employees);

        assert_eq!(rows[0].employee_name, UNKNOWN_EMPLOYEE_NAME);
        assert_eq!(rows[0].department, UNKNOWN_DEPARTMENT);
    }

    #[test]
    fn enrich_is_idempotent() {
        let employees = vec![
            employee("1", "EMP001", "Alice", "Engineering"),
            employee("2", "EMP002", "Bob", "Finance"),
        ];
        let attendance = vec![
            mark("A1", "2", "2024-03-20", AttendanceStatus::Absent),
            mark("A2", "9", "2024-03-21", AttendanceStatus::Present),
            mark("A3", "1", "2024-03-21", AttendanceStatus::Present),
        ];

        let first = enrich(&attendance, &employees);
        let second = enrich(&attendance, &employees);

        assert_eq!(first, second);
        let ids: Vec<_> = first.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
        assert_eq!(first[1].employee_name, "Unknown");
    }

    #[test]
    fn today_stats_only_counts_the_given_day() {
        let records = vec![
            mark("A1", "1", "2024-03-20", AttendanceStatus::Present),
            mark("A2", "2", "2024-03-20", AttendanceStatus::Absent),
            mark("A3", "3", "2024-03-20", AttendanceStatus::Present),
            mark("A4", "1", "2024-03-19", AttendanceStatus::Absent),
        ];

        let stats = today_stats(&records, day("2024-03-20"));

        assert_eq!(stats, TodayStats { present: 2, absent: 1 });
        let todays = records.iter().filter(|a| a.date == day("2024-03-20")).count();
        assert_eq!(stats.total(), todays);
    }

    #[test]
    fn today_index_keys_by_employee() {
        let employees = vec![employee("1", "EMP001", "Alice", "Engineering")];
        let rows = enrich(
            &[
                mark("A1", "1", "2024-03-20", AttendanceStatus::Present),
                mark("A2", "1", "2024-03-19", AttendanceStatus::Absent),
            ],
            &employees,
        );

        let index = today_index(&rows, day("2024-03-20"));

        assert_eq!(index.len(), 1);
        assert_eq!(index["1"].id(), "A1");
        assert!(today_index(&rows, day("2024-01-01")).is_empty());
    }

    #[test]
    fn employee_search_is_case_insensitive_across_fields() {
        let employees = vec![
            employee("1", "EMP001", "Ajay Maurya", "Engineering"),
            employee("2", "EMP002", "Jane Smith", "Human Resources"),
        ];

        let by_name = EmployeeFilter {
            search: Some("jane".into()),
            department: None,
        };
        assert_eq!(by_name.apply(&employees).len(), 1);

        let by_code = EmployeeFilter {
            search: Some("emp00".into()),
            department: Some("Engineering".into()),
        };
        let hits = by_code.apply(&employees);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        assert_eq!(EmployeeFilter::default().apply(&employees).len(), 2);
    }

    #[test]
    fn attendance_filter_sorts_newest_first() {
        let employees = vec![employee("1", "EMP001", "Alice", "Engineering")];
        let rows = enrich(
            &[
                mark("A1", "1", "2024-03-18", AttendanceStatus::Present),
                mark("A2", "1", "2024-03-20", AttendanceStatus::Present),
                mark("A3", "1", "2024-03-19", AttendanceStatus::Absent),
            ],
            &employees,
        );

        let present = AttendanceFilter {
            date: None,
            status: Some(AttendanceStatus::Present),
        };
        let ids: Vec<_> = present.apply(&rows).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A2", "A1"]);

        let on_day = AttendanceFilter {
            date: Some(day("2024-03-19")),
            status: None,
        };
        assert_eq!(on_day.apply(&rows).len(), 1);
    }

    #[test]
    fn recent_truncates_after_sorting() {
        let rows = enrich(
            &[
                mark("A1", "1", "2024-03-18", AttendanceStatus::Present),
                mark("A2", "1", "2024-03-20", AttendanceStatus::Present),
                mark("A3", "1", "2024-03-19", AttendanceStatus::Absent),
            ],
            &[],
        );

        let ids: Vec<_> = recent(&rows, 2).iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A2", "A3"]);
    }
}
