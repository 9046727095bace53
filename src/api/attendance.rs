use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, info};

use crate::directory::SharedDirectory;
use crate::error::HrmsError;
use crate::model::{Attendance, NewAttendance};

/// List attendance
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    responses(
        (status = 200, description = "All attendance records, newest date first", body = [Attendance])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(directory: web::Data<SharedDirectory>) -> actix_web::Result<impl Responder> {
    let mut records = directory.read().await.attendance().to_vec();
    records.sort_by(|a, b| b.date.cmp(&a.date));

    debug!(count = records.len(), "Listing attendance");
    Ok(HttpResponse::Ok().json(records))
}

/// Attendance of one employee
#[utoipa::path(
    get,
    path = "/api/v1/attendance/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Internal employee id")
    ),
    responses(
        (status = 200, description = "The employee's records, newest date first", body = [Attendance])
    ),
    tag = "Attendance"
)]
pub async fn employee_attendance(
    directory: web::Data<SharedDirectory>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let records = directory.read().await.attendance_for(&employee_id);

    Ok(HttpResponse::Ok().json(records))
}

/// Mark attendance
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = NewAttendance,
    responses(
        (status = 201, description = "Attendance marked", body = Attendance),
        (status = 400, description = "Already marked for this employee on this date", body = Object, example = json!({
            "detail": "Attendance already marked for this employee on this date"
        })),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "detail": "Employee not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    directory: web::Data<SharedDirectory>,
    payload: web::Json<NewAttendance>,
) -> Result<HttpResponse, HrmsError> {
    let record = directory.write().await.create_attendance(payload.into_inner())?;

    info!(
        id = %record.id,
        employee_id = %record.employee_id,
        date = %record.date,
        status = %record.status,
        "Attendance marked"
    );
    Ok(HttpResponse::Created().json(record))
}

/// Update attendance
#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}",
    params(
        ("id", Path, description = "Attendance record id")
    ),
    request_body = NewAttendance,
    responses(
        (status = 200, description = "Record updated", body = Attendance),
        (status = 400, description = "Another record exists on the new date", body = Object),
        (status = 404, description = "Attendance record not found", body = Object, example = json!({
            "detail": "Attendance record not found"
        }))
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    directory: web::Data<SharedDirectory>,
    path: web::Path<String>,
    payload: web::Json<NewAttendance>,
) -> Result<HttpResponse, HrmsError> {
    let id = path.into_inner();
    let record = directory
        .write()
        .await
        .update_attendance(&id, payload.into_inner())?;

    info!(id = %record.id, status = %record.status, "Attendance updated");
    Ok(HttpResponse::Ok().json(record))
}
