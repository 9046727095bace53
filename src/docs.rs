use crate::model::{Attendance, AttendanceStatus, Employee, NewAttendance, NewEmployee, TodayStats};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "0.1.0",
        description = r#"
## HRMS Lite

Employee directory and daily attendance marking.

### Key Features
- **Employees**
  - Add, list and remove employees. `employeeId` (and email) must be unique.
- **Attendance**
  - Mark an employee Present or Absent for a day, change the status later,
    list everything or one employee's history.
  - At most one record per employee and day.

### Errors
Failures answer with a JSON body `{"detail": "<message>"}` meant to be shown
to the user as-is.
"#,
    ),
    paths(
        crate::api::health,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::employee_attendance,
        crate::api::attendance::mark_attendance,
        crate::api::attendance::update_attendance,
    ),
    components(
        schemas(
            Employee,
            NewEmployee,
            Attendance,
            NewAttendance,
            AttendanceStatus,
            TodayStats
        )
    ),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance marking APIs"),
        (name = "Health", description = "Service status"),
    )
)]
pub struct ApiDoc;
