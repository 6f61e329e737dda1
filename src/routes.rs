use crate::{
    api::{attendance, employee, health, route_not_found, summary},
    config::Config,
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{Resource, http::header, web};
use anyhow::anyhow;

pub type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP budget of `requests_per_min`, refilled evenly across the minute.
pub fn build_limiter(requests_per_min: u32) -> anyhow::Result<LimiterConfig> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} per minute"))
}

/// Browser access for `origin`, or for any origin when it is `*`.
pub fn build_cors(origin: &str) -> Cors {
    let cors = if origin == "*" {
        Cors::default().allow_any_origin().send_wildcard()
    } else {
        Cors::default().allowed_origin(origin)
    };

    cors.allowed_methods(["GET", "POST", "DELETE"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: &LimiterConfig) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(limiter)) // rate limiting
            .configure(api_routes),
    );
}

/// A resource that answers unsupported methods like an unknown route.
fn resource(path: &str) -> Resource {
    web::resource(path).default_service(web::to(route_not_found))
}

pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(resource("/health").route(web::get().to(health::health)))
        .service(resource("/ready").route(web::get().to(health::ready)))
        .service(resource("/summary").route(web::get().to(summary::summary)))
        .service(
            web::scope("/employees")
                // /employees
                .service(
                    resource("")
                        .route(web::get().to(employee::list_employees))
                        .route(web::post().to(employee::create_employee)),
                )
                // /employees/{employee_id}
                .service(
                    resource("/{employee_id}").route(web::delete().to(employee::delete_employee)),
                )
                // /employees/{employee_id}/attendance
                .service(
                    resource("/{employee_id}/attendance")
                        .route(web::get().to(attendance::list_attendance))
                        .route(web::post().to(attendance::mark_attendance)),
                ),
        );
}
