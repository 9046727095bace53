use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::HrmsError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "ATT001",
        "employeeId": "1",
        "date": "2024-03-20",
        "status": "Present",
        "createdAt": "2024-03-20T09:00:00Z",
        "updatedAt": "2024-03-20T09:00:00Z"
    })
)]
pub struct Attendance {
    #[schema(example = "ATT001")]
    pub id: String,

    /// Internal id of the employee (`Employee::id`), not the business key
    #[schema(example = "1")]
    pub employee_id: String,

    #[serde(with = "calendar_day")]
    #[schema(example = "2024-03-20", format = "date", value_type = String)]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(example = "2024-03-20T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2024-03-20T09:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    #[schema(example = "1")]
    pub employee_id: String,
    #[serde(with = "calendar_day")]
    #[schema(example = "2024-03-20", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl NewAttendance {
    pub fn new(employee_id: impl Into<String>, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            employee_id: employee_id.into(),
            date,
            status,
        }
    }

    pub fn validate(&self) -> Result<(), HrmsError> {
        if self.employee_id.trim().is_empty() {
            return Err(HrmsError::Invalid("employeeId is required".into()));
        }
        Ok(())
    }
}

/// Attendance joined with the employee's display fields.
///
/// `employee_name` and `department` are computed at read time from the
/// current employee collection (see [`crate::join::enrich`]) and never sent
/// back to the remote side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(flatten)]
    pub attendance: Attendance,
    pub employee_name: String,
    pub department: String,
}

impl AttendanceRecord {
    pub fn id(&self) -> &str {
        &self.attendance.id
    }

    pub fn employee_id(&self) -> &str {
        &self.attendance.employee_id
    }

    pub fn date(&self) -> NaiveDate {
        self.attendance.date
    }

    pub fn status(&self) -> AttendanceStatus {
        self.attendance.status
    }
}

/// Parses a calendar day, ignoring anything after `YYYY-MM-DD`.
///
/// The backend may hand dates back as full timestamps
/// (`2024-03-20T00:00:00Z`); only the day is meaningful here.
pub fn parse_day(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, calendar_day::FORMAT)
}

pub(crate) mod calendar_day {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_day(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_through_its_wire_name() {
        assert_eq!(AttendanceStatus::Present.to_string(), "Present");
        assert_eq!(
            AttendanceStatus::from_str("Absent").unwrap(),
            AttendanceStatus::Absent
        );
        assert!(AttendanceStatus::from_str("Late").is_err());
    }

    #[test]
    fn date_accepts_full_timestamps() {
        let json = r#"{"employeeId":"1","date":"2024-03-20T00:00:00Z","status":"Present"}"#;
        let parsed: NewAttendance = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());
    }

    #[test]
    fn date_is_written_as_plain_day() {
        let new = NewAttendance::new(
            "1",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            AttendanceStatus::Absent,
        );
        let json = serde_json::to_value(&new).unwrap();

        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["status"], "Absent");
    }

    #[test]
    fn record_flattens_attendance_fields() {
        let now = Utc::now();
        let record = AttendanceRecord {
            attendance: Attendance {
                id: "ATT001".into(),
                employee_id: "1".into(),
                date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
                status: AttendanceStatus::Present,
                created_at: now,
                updated_at: now,
            },
            employee_name: "Alice".into(),
            department: "Engineering".into(),
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], "ATT001");
        assert_eq!(json["employeeName"], "Alice");
        assert_eq!(json["date"], "2024-03-20");
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert!(parse_day("20-03-2024").is_err());
        assert!(parse_day("").is_err());
    }
}
