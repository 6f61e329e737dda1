use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{api::ErrorBody, error::AppError, model::summary::Summary, service::HrService};

#[derive(Serialize, ToSchema)]
pub struct SummaryResponse {
    pub data: Summary,
}

/// Headcount and attendance totals, overall and for today (UTC)
#[utoipa::path(
    get,
    path = "/api/summary",
    responses(
        (status = 200, description = "Current totals", body = SummaryResponse),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Summary"
)]
pub async fn summary(service: web::Data<HrService>) -> Result<impl Responder, AppError> {
    let data = service.summary().await?;
    Ok(HttpResponse::Ok().json(SummaryResponse { data }))
}
