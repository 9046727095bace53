use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HrmsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": "4f1c2a9e-3b7d-4c55-9d0e-0a6f8b1e2c3d",
        "employeeId": "EMP001",
        "fullName": "Ajay Maurya",
        "email": "ajay@hrms.com",
        "department": "Engineering",
        "createdAt": "2024-03-20T09:00:00Z",
        "updatedAt": "2024-03-20T09:00:00Z"
    })
)]
pub struct Employee {
    /// Internal id, assigned by the directory
    #[schema(example = "4f1c2a9e-3b7d-4c55-9d0e-0a6f8b1e2c3d")]
    pub id: String,

    /// Human-facing business key
    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "Ajay Maurya")]
    pub full_name: String,

    #[schema(example = "ajay@hrms.com")]
    pub email: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "2024-03-20T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2024-03-20T09:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    #[schema(example = "EMP003")]
    pub employee_id: String,
    #[schema(example = "Priya Nair")]
    pub full_name: String,
    #[schema(example = "priya@hrms.com", format = "email")]
    pub email: String,
    #[schema(example = "Design")]
    pub department: String,
}

impl NewEmployee {
    pub fn new(
        employee_id: impl Into<String>,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            department: department.into(),
        }
    }

    /// Presence check only: every field must carry non-blank text.
    pub fn validate(&self) -> Result<(), HrmsError> {
        let fields = [
            ("employeeId", &self.employee_id),
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("department", &self.department),
        ];

        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(HrmsError::Invalid(format!("{name} is required"))),
            None => Ok(()),
        }
    }
}
