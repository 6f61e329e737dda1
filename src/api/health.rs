use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::warn;

use crate::service::HrService;
use crate::utils::time;

/// Liveness, never touches the store
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "ok",
            "time": "2024-01-01T09:30:00.000Z"
        }))
    ),
    tag = "Health"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "time": time::to_iso(&time::now())
    }))
}

/// Readiness, fails while the store cannot be reached
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Store reachable", body = Object, example = json!({
            "status": "ready"
        })),
        (status = 503, description = "Store unreachable", body = Object, example = json!({
            "status": "unavailable"
        }))
    ),
    tag = "Health"
)]
pub async fn ready(service: web::Data<HrService>) -> impl Responder {
    match service.ready().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}
