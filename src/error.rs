use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Failures surfaced by the directory, the remote access layer and the
/// stores. The display text is the message shown to the user as-is.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum HrmsError {
    /// `employeeId` (or email) already taken
    #[display(fmt = "{}", _0)]
    DuplicateKey(String),

    /// attendance already marked for the (employee, date) pair
    #[display(fmt = "{}", _0)]
    DuplicateRecord(String),

    /// attendance references an employee id that does not resolve
    #[display(fmt = "{}", _0)]
    UnknownEmployee(String),

    #[display(fmt = "{}", _0)]
    NotFound(String),

    /// a required field is missing or blank
    #[display(fmt = "{}", _0)]
    Invalid(String),

    /// the server refused the request for a reason we do not classify
    #[display(fmt = "{}", message)]
    Rejected { status: u16, message: String },

    /// network failure, server error or unreadable response
    #[display(fmt = "{}", _0)]
    Transport(String),
}

impl std::error::Error for HrmsError {}

impl HrmsError {
    pub fn duplicate_employee() -> Self {
        HrmsError::DuplicateKey("Employee with this ID or Email already exists".into())
    }

    pub fn duplicate_attendance() -> Self {
        HrmsError::DuplicateRecord(
            "Attendance already marked for this employee on this date".into(),
        )
    }

    pub fn unknown_employee() -> Self {
        HrmsError::UnknownEmployee("Employee not found".into())
    }

    pub fn attendance_not_found() -> Self {
        HrmsError::NotFound("Attendance record not found".into())
    }
}

impl ResponseError for HrmsError {
    fn status_code(&self) -> StatusCode {
        match self {
            HrmsError::DuplicateKey(_) | HrmsError::DuplicateRecord(_) => StatusCode::BAD_REQUEST,
            HrmsError::UnknownEmployee(_) | HrmsError::NotFound(_) => StatusCode::NOT_FOUND,
            HrmsError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            HrmsError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_REQUEST)
            }
            HrmsError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "detail": self.to_string()
        }))
    }
}
