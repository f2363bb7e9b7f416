use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use quiz_payment_engine::{
    db_types::PaymentStatusType,
    traits::{PaymentStatusQueryError, PaymentStatusView, QuizResultSummary, UserSummary},
    PaymentStatusApi,
};
use serde_json::Value;

use super::{helpers::send_request, mocks::MockStatusReporter};
use crate::routes::PaymentStatusRoute;

fn completed_payment() -> PaymentStatusView {
    PaymentStatusView {
        order_id: "QUIZ-2024-0042".into(),
        status: PaymentStatusType::Completed,
        amount: Some("49000.00".into()),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 58, 0).unwrap(),
        completed_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
        quiz_result: Some(QuizResultSummary { id: "quiz-result-42".into(), is_premium: true }),
        user: Some(UserSummary {
            id: "user-42".into(),
            email: Some("ayu@example.com".into()),
            name: Some("Ayu".into()),
        }),
    }
}

fn configure(db: MockStatusReporter) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(PaymentStatusApi::new(db)))
            .service(PaymentStatusRoute::<MockStatusReporter>::new());
    }
}

async fn get_status(db: MockStatusReporter, order_id: &str) -> (StatusCode, String) {
    let req = TestRequest::get().uri(&format!("/payment-status/{order_id}"));
    send_request(req, configure(db)).await
}

#[actix_web::test]
async fn fetch_completed_payment() {
    let _ = env_logger::try_init().ok();
    let mut db = MockStatusReporter::new();
    db.expect_fetch_payment_status()
        .withf(|id| id.as_str() == "QUIZ-2024-0042")
        .times(1)
        .returning(|_| Ok(Some(completed_payment())));
    let (status, body) = get_status(db, "QUIZ-2024-0042").await;
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).expect("status view is JSON");
    assert_eq!(view["order_id"], "QUIZ-2024-0042");
    assert_eq!(view["status"], "completed");
    assert_eq!(view["amount"], "49000.00");
    assert_eq!(view["completed_at"], "2024-05-01T10:00:00Z");
    assert_eq!(view["quiz_result"]["is_premium"], true);
    assert_eq!(view["user"]["email"], "ayu@example.com");
}

#[actix_web::test]
async fn unknown_order_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockStatusReporter::new();
    db.expect_fetch_payment_status().times(1).returning(|_| Ok(None));
    let (status, body) = get_status(db, "QUIZ-NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Payment not found"}"#);
}

#[actix_web::test]
async fn database_error_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut db = MockStatusReporter::new();
    db.expect_fetch_payment_status()
        .times(1)
        .returning(|_| Err(PaymentStatusQueryError::DatabaseError("no such table: payments".into())));
    let (status, body) = get_status(db, "QUIZ-2024-0042").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("no such table"));
}
