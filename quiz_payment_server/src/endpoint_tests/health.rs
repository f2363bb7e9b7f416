use actix_web::{http::StatusCode, test::TestRequest};

use super::helpers::send_request;
use crate::{data_objects::HealthResponse, routes::health};

#[actix_web::test]
async fn health_check_reports_service_metadata() {
    let _ = env_logger::try_init().ok();
    let (status, body) = send_request(TestRequest::get().uri("/health"), |cfg| {
        cfg.service(health);
    })
    .await;
    assert_eq!(status, StatusCode::OK);
    let resp: HealthResponse = serde_json::from_str(&body).expect("health response is JSON");
    assert_eq!(resp.status, "ok");
    assert_eq!(resp.service, "quiz_payment_server");
    assert_eq!(resp.version, env!("CARGO_PKG_VERSION"));
}
