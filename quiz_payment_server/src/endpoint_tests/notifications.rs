use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::Utc;
use mockall::Sequence;
use qpg_common::Secret;
use quiz_payment_engine::{
    db_types::{Payment, PaymentStatusType},
    helpers::SignatureVerifier,
    traits::PaymentRecordsError,
    NotificationApi,
};
use serde_json::{json, Value};

use super::{
    helpers::{post_json, send_request},
    mocks::MockPaymentRecorder,
};
use crate::{config::ProxyConfig, data_objects::NotificationResponse, routes::PaymentNotificationRoute};

const SERVER_KEY: &str = "SB-Mid-server-endpoint-tests";
const ORDER_ID: &str = "QUIZ-2024-0042";

fn verifier() -> SignatureVerifier {
    SignatureVerifier::new(Secret::new(SERVER_KEY.to_string()))
}

fn notification(status: &str, fraud_status: Option<&str>) -> Value {
    let signature = verifier().expected_signature(ORDER_ID, "200", "49000.00");
    json!({
        "transaction_time": "2024-05-01 10:00:00",
        "transaction_status": status,
        "transaction_id": "9aed5972-5b6a-401e-894b-a32c91ed1a3a",
        "status_code": "200",
        "signature_key": signature,
        "payment_type": "bank_transfer",
        "order_id": ORDER_ID,
        "gross_amount": "49000.00",
        "fraud_status": fraud_status,
        "currency": "IDR"
    })
}

fn payment() -> Payment {
    let now = Utc::now();
    Payment {
        id: 42,
        transaction_id: ORDER_ID.into(),
        quiz_result_id: "quiz-result-42".to_string(),
        user_id: "user-42".to_string(),
        amount: Some("49000.00".to_string()),
        status: PaymentStatusType::Pending,
        created_at: now,
        updated_at: now,
        completed_at: None,
    }
}

fn configure(db: MockPaymentRecorder) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(ProxyConfig::default()))
            .app_data(web::Data::new(NotificationApi::new(db, verifier())))
            .service(PaymentNotificationRoute::<MockPaymentRecorder>::new());
    }
}

async fn post_notification(db: MockPaymentRecorder, body: &str) -> (StatusCode, String) {
    send_request(post_json("/payment-notification", body), configure(db)).await
}

#[actix_web::test]
async fn settlement_is_accepted() {
    let _ = env_logger::try_init().ok();
    let mut db = MockPaymentRecorder::new();
    let mut seq = Sequence::new();
    db.expect_find_payment_by_transaction_id()
        .withf(|id| id.as_str() == ORDER_ID)
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(payment()));
    db.expect_update_quiz_result_premium()
        .withf(|id| id == "quiz-result-42")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(()));
    db.expect_update_payment_status()
        .withf(|id, status, completed_at| {
            id.as_str() == ORDER_ID && *status == PaymentStatusType::Completed && completed_at.is_some()
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _, _| Ok(()));

    let (status, body) = post_notification(db, &notification("settlement", None).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let response: NotificationResponse = serde_json::from_str(&body).expect("response is JSON");
    assert_eq!(response.message, "Payment completed");
    assert_eq!(response.order_id.as_deref(), Some(ORDER_ID));
    assert!(response.processing_time_ms.is_some());
}

#[actix_web::test]
async fn failed_payment_is_accepted_even_when_bookkeeping_fails() {
    let _ = env_logger::try_init().ok();
    let mut db = MockPaymentRecorder::new();
    db.expect_find_payment_by_transaction_id().times(1).returning(|_| Ok(payment()));
    db.expect_update_quiz_result_premium().never();
    db.expect_update_payment_status()
        .withf(|_, status, completed_at| *status == PaymentStatusType::Failed && completed_at.is_none())
        .times(1)
        .returning(|_, _, _| Err(PaymentRecordsError::DatabaseError("database is locked".into())));

    let (status, body) = post_notification(db, &notification("expire", None).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let response: NotificationResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.message, "Payment marked as failed");
}

#[actix_web::test]
async fn unrecognized_status_is_acknowledged_without_touching_the_store() {
    let _ = env_logger::try_init().ok();
    // Any call on a mock without expectations fails the test
    let db = MockPaymentRecorder::new();
    let (status, body) = post_notification(db, &notification("capture", Some("challenge")).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let response: NotificationResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.message, "Notification acknowledged");
    assert_eq!(response.order_id.as_deref(), Some(ORDER_ID));
}

#[actix_web::test]
async fn missing_fields_are_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let mut body = notification("settlement", None);
    body.as_object_mut().unwrap().remove("signature_key");
    body["gross_amount"] = json!("");
    let (status, body) = post_notification(MockPaymentRecorder::new(), &body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Missing required fields: gross_amount, signature_key"}"#);
}

#[actix_web::test]
async fn invalid_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut body = notification("settlement", None);
    body["gross_amount"] = json!("1.00");
    let (status, body) = post_notification(MockPaymentRecorder::new(), &body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Invalid signature"}"#);
}

#[actix_web::test]
async fn uppercase_signature_is_rejected() {
    let _ = env_logger::try_init().ok();
    let mut body = notification("settlement", None);
    let upper = body["signature_key"].as_str().unwrap().to_uppercase();
    body["signature_key"] = json!(upper);
    let (status, _) = post_notification(MockPaymentRecorder::new(), &body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn settlement_for_unknown_payment_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut db = MockPaymentRecorder::new();
    db.expect_find_payment_by_transaction_id()
        .times(1)
        .returning(|id| Err(PaymentRecordsError::PaymentNotFound(id.clone())));
    db.expect_update_quiz_result_premium().never();
    db.expect_update_payment_status().never();
    let (status, body) = post_notification(db, &notification("settlement", None).to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"Payment not found"}"#);
}

#[actix_web::test]
async fn premium_upgrade_failure_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut db = MockPaymentRecorder::new();
    db.expect_find_payment_by_transaction_id().times(1).returning(|_| Ok(payment()));
    db.expect_update_quiz_result_premium()
        .times(1)
        .returning(|id| Err(PaymentRecordsError::QuizResultNotFound(id.to_string())));
    db.expect_update_payment_status().never();
    let (status, body) = post_notification(db, &notification("capture", Some("accept")).to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"Failed to update quiz result"}"#);
}

#[actix_web::test]
async fn database_faults_do_not_leak() {
    let _ = env_logger::try_init().ok();
    let mut db = MockPaymentRecorder::new();
    db.expect_find_payment_by_transaction_id()
        .times(1)
        .returning(|_| Err(PaymentRecordsError::DatabaseError("unable to open database file".into())));
    let (status, body) = post_notification(db, &notification("settlement", None).to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"error":"Internal server error"}"#);
}

#[actix_web::test]
async fn numeric_fields_are_verified_as_sent() {
    let _ = env_logger::try_init().ok();
    // The amount is a bare decimal, and its trailing zeros are part of the signed text
    let signature = verifier().expected_signature(ORDER_ID, "201", "49000.00");
    let body = format!(
        r#"{{"transaction_status": "pending", "order_id": "{ORDER_ID}", "status_code": 201, "gross_amount": 49000.00, "signature_key": "{signature}"}}"#
    );
    let mut db = MockPaymentRecorder::new();
    db.expect_find_payment_by_transaction_id().times(1).returning(|_| Ok(payment()));
    db.expect_update_payment_status()
        .withf(|_, status, _| *status == PaymentStatusType::Pending)
        .times(1)
        .returning(|_, _, _| Ok(()));
    let (status, body) = post_notification(db, &body).await;
    assert_eq!(status, StatusCode::OK);
    let response: NotificationResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.message, "Payment is pending");
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_notification(MockPaymentRecorder::new(), r#"{"order_id": "QUIZ-1", "#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).expect("error body is JSON");
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON payload"));

    let (status, _) = post_notification(MockPaymentRecorder::new(), r#"{"order_id": ["QUIZ-1"]}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
