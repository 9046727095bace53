use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, info};

use crate::directory::SharedDirectory;
use crate::error::HrmsError;
use crate::model::{Employee, NewEmployee};

/// List Employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(directory: web::Data<SharedDirectory>) -> actix_web::Result<impl Responder> {
    let mut employees = directory.read().await.employees().to_vec();
    employees.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    debug!(count = employees.len(), "Listing employees");
    Ok(HttpResponse::Ok().json(employees))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = NewEmployee,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Employee ID or email already taken", body = Object, example = json!({
            "detail": "Employee with this ID or Email already exists"
        })),
        (status = 422, description = "A required field is blank", body = Object, example = json!({
            "detail": "employeeId is required"
        }))
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    directory: web::Data<SharedDirectory>,
    payload: web::Json<NewEmployee>,
) -> Result<HttpResponse, HrmsError> {
    let employee = directory.write().await.create_employee(payload.into_inner())?;

    info!(id = %employee.id, employee_id = %employee.employee_id, "Employee created");
    Ok(HttpResponse::Created().json(employee))
}

/// Delete Employee
///
/// Deleting an id that does not exist is not an error.
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    params(
        ("id", Path, description = "Internal employee id")
    ),
    responses(
        (status = 204, description = "Employee removed (or was already absent)")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    directory: web::Data<SharedDirectory>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let id = path.into_inner();

    match directory.write().await.delete_employee(&id) {
        Some(removed) => info!(id = %id, employee_id = %removed.employee_id, "Employee deleted"),
        None => debug!(id = %id, "Delete of absent employee"),
    }
    Ok(HttpResponse::NoContent().finish())
}
