pub mod attendance;
pub mod employee;
pub mod health;
pub mod summary;

use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    web,
};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use utoipa::ToSchema;

/// Shape of every error body.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Missing required fields")]
    pub error: String,

    #[schema(value_type = Object, example = json!({ "fields": ["email"] }))]
    pub details: Option<serde_json::Value>,
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1024 * 1024)
        .error_handler(invalid_json)
}

fn invalid_json(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected request body");
    InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(json!({ "error": "Invalid JSON body" })),
    )
    .into()
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(invalid_query)
}

fn invalid_query(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "Rejected query string");
    InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(json!({ "error": "Invalid query string" })),
    )
    .into()
}

pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Route not found" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{api_routes, build_cors};
    use crate::service::HrService;
    use crate::store::MemoryStore;
    use actix_web::{App, http::StatusCode, http::header, test};
    use serde_json::Value;
    use std::sync::Arc;

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .wrap(build_cors("*"))
                    .app_data(web::Data::new(HrService::new(Arc::new(MemoryStore::new()))))
                    .app_data(json_config())
                    .app_data(query_config())
                    .service(web::scope("/api").configure(api_routes))
                    .default_service(web::to(route_not_found)),
            )
            .await
        };
    }

    fn employee_body(id: &str, email: &str) -> Value {
        json!({
            "employeeId": id,
            "fullName": "Grace Hopper",
            "email": email,
            "department": "Navy"
        })
    }

    #[actix_web::test]
    async fn health_reports_ok_with_time() {
        let app = app!();
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert!(body["time"].as_str().unwrap().ends_with('Z'));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/ready").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn employee_lifecycle_over_http() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(employee_body("EMP-7", "Grace@Navy.MIL"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["employeeId"], "EMP-7");
        assert_eq!(body["data"]["email"], "grace@navy.mil");
        assert!(body["data"]["createdAt"].is_string());

        let req = test::TestRequest::post()
            .uri("/api/employees/EMP-7/attendance")
            .set_json(json!({ "date": "2024-06-03", "status": "present" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({ "data": { "employeeId": "EMP-7", "date": "2024-06-03", "status": "Present" } })
        );

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/employees").to_request()).await;
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"][0]["presentCount"], 1);
        assert_eq!(body["data"][0]["attendanceCount"], 1);

        let req = test::TestRequest::get()
            .uri("/api/employees/EMP-7/attendance?date=2024-06-03")
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["status"], "Present");
        assert!(body["data"][0]["id"].as_u64().is_some());
        assert!(body["data"][0]["createdAt"].is_string());

        let req = test::TestRequest::delete().uri("/api/employees/EMP-7").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/employees/EMP-7/attendance").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Employee not found" }));
    }

    #[actix_web::test]
    async fn errors_map_to_status_and_details() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(json!({ "employeeId": 12, "fullName": "X", "department": "Y" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["details"], json!({ "fields": ["employeeId", "email"] }));

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(employee_body("E1", "e1@x.io"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(employee_body("E1", "other@x.io"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Duplicate employeeId", "details": { "field": "employeeId" } }));

        let req = test::TestRequest::post()
            .uri("/api/employees/E1/attendance")
            .set_json(json!({ "date": "2024-02-30", "status": "Present" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["details"], json!({ "field": "date" }));

        let req = test::TestRequest::get()
            .uri("/api/employees/E1/attendance?date=yesterday")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_body_and_unknown_route() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .insert_header(("content-type", "application/json"))
            .set_payload("{ not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Invalid JSON body" }));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nope").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Route not found" }));
    }

    #[actix_web::test]
    async fn unsupported_methods_are_unknown_routes() {
        let app = app!();

        for req in [
            test::TestRequest::put().uri("/api/employees"),
            test::TestRequest::patch().uri("/api/employees/E1"),
            test::TestRequest::delete().uri("/api/employees/E1/attendance"),
            test::TestRequest::post().uri("/api/summary"),
        ] {
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Route not found" }));
        }
    }

    #[actix_web::test]
    async fn unparsable_query_gets_a_json_error() {
        let app = app!();

        let req = test::TestRequest::post()
            .uri("/api/employees")
            .set_json(employee_body("E1", "e1@x.io"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/api/employees/E1/attendance?date=2024-01-01&date=2024-01-02")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Invalid query string" }));
    }

    #[actix_web::test]
    async fn cors_allows_any_origin_by_default() {
        let app = app!();

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/employees")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let methods = resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("DELETE"));
    }

    #[actix_web::test]
    async fn cors_echoes_a_configured_origin() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors("https://hr.example.com"))
                .app_data(web::Data::new(HrService::new(Arc::new(MemoryStore::new()))))
                .service(web::scope("/api").configure(api_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "https://hr.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://hr.example.com"
        );
    }

    #[actix_web::test]
    async fn summary_over_http() {
        let app = app!();
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/summary").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["totalEmployees"], 0);
        assert_eq!(body["data"]["totalAttendance"], 0);
        assert!(body["data"]["todayDate"].is_string());
    }
}
