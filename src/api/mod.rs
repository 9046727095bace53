use actix_web::{HttpResponse, Responder, web};
use serde_json::json;

use crate::config::Config;

pub mod attendance;
pub mod employee;

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "ok",
            "project": "HRMS Backend"
        }))
    ),
    tag = "Health"
)]
pub async fn health(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "project": config.project_name
    }))
}
