use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::HrmsApi;
use crate::error::HrmsError;
use crate::model::{Attendance, Employee, NewAttendance, NewEmployee};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Calls the HRMS REST service.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, HrmsError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HrmsError::Transport(format!("failed to build http client: {e}")))?;

        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Result<Self, HrmsError> {
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| HrmsError::Transport(format!("invalid API base url: {raw}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<Url, HrmsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| HrmsError::Transport(format!("invalid API base url: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, op: Operation, request: reqwest::RequestBuilder) -> Result<Response, HrmsError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, operation = ?op, "Request failed");
            HrmsError::Transport(op.fallback().to_string())
        })?;

        if response.status().is_success() {
            return Ok(response);
        }
        Err(failure(op, response).await)
    }

    async fn fetch<T: DeserializeOwned>(&self, op: Operation, request: reqwest::RequestBuilder) -> Result<T, HrmsError> {
        let response = self.send(op, request).await?;
        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, operation = ?op, "Unreadable response body");
            HrmsError::Transport(op.fallback().to_string())
        })
    }
}

#[async_trait]
impl HrmsApi for HttpApi {
    async fn list_employees(&self) -> Result<Vec<Employee>, HrmsError> {
        let request = self.client.get(self.url(&["employees", ""])?);
        self.fetch(Operation::ListEmployees, request).await
    }

    async fn create_employee(&self, new: NewEmployee) -> Result<Employee, HrmsError> {
        new.validate()?;
        let request = self.client.post(self.url(&["employees", ""])?).json(&new);
        self.fetch(Operation::AddEmployee, request).await
    }

    async fn delete_employee(&self, id: &str) -> Result<(), HrmsError> {
        let request = self.client.delete(self.url(&["employees", id])?);
        match self.send(Operation::DeleteEmployee, request).await {
            Ok(_) => Ok(()),
            Err(HrmsError::NotFound(_)) => {
                debug!(id, "Employee already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn list_raw_attendance(&self) -> Result<Vec<Attendance>, HrmsError> {
        let request = self.client.get(self.url(&["attendance", ""])?);
        self.fetch(Operation::ListAttendance, request).await
    }

    async fn employee_attendance(&self, employee_id: &str) -> Result<Vec<Attendance>, HrmsError> {
        let request = self
            .client
            .get(self.url(&["attendance", "employee", employee_id])?);
        self.fetch(Operation::ListAttendance, request).await
    }

    async fn create_attendance(&self, new: NewAttendance) -> Result<Attendance, HrmsError> {
        new.validate()?;
        let request = self.client.post(self.url(&["attendance", ""])?).json(&new);
        self.fetch(Operation::MarkAttendance, request).await
    }

    async fn update_attendance(&self, id: &str, new: NewAttendance) -> Result<Attendance, HrmsError> {
        let request = self
            .client
            .put(self.url(&["attendance", id])?)
            .json(&new);
        self.fetch(Operation::UpdateAttendance, request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    ListEmployees,
    AddEmployee,
    DeleteEmployee,
    ListAttendance,
    MarkAttendance,
    UpdateAttendance,
}

impl Operation {
    fn fallback(self) -> &'static str {
        match self {
            Operation::ListEmployees => "Failed to load employees",
            Operation::AddEmployee => "Failed to add employee",
            Operation::DeleteEmployee => "Failed to delete employee",
            Operation::ListAttendance => "Failed to load attendance",
            Operation::MarkAttendance => "Failed to mark attendance",
            Operation::UpdateAttendance => "Failed to update attendance",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

async fn failure(op: Operation, response: Response) -> HrmsError {
    let status = response.status();
    // validation errors may carry a list of problems instead of a message
    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            Value::String(message) if !message.is_empty() => Some(message),
            _ => None,
        });

    warn!(status = status.as_u16(), operation = ?op, detail = ?detail, "Request rejected");
    classify(op, status, detail)
}

/// Maps a non-success response onto the error taxonomy.
fn classify(op: Operation, status: StatusCode, detail: Option<String>) -> HrmsError {
    let message = detail.unwrap_or_else(|| op.fallback().to_string());

    if status.is_server_error() {
        return HrmsError::Transport(message);
    }

    match (op, status) {
        (_, StatusCode::UNPROCESSABLE_ENTITY) => HrmsError::Invalid(message),
        (Operation::AddEmployee, StatusCode::BAD_REQUEST | StatusCode::CONFLICT) => {
            HrmsError::DuplicateKey(message)
        }
        (
            Operation::MarkAttendance | Operation::UpdateAttendance,
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT,
        ) => HrmsError::DuplicateRecord(message),
        (Operation::MarkAttendance, StatusCode::NOT_FOUND) => HrmsError::UnknownEmployee(message),
        (_, StatusCode::NOT_FOUND) => HrmsError::NotFound(message),
        _ => HrmsError::Rejected {
            status: status.as_u16(),
            message,
        },
    }
}
