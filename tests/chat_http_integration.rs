//! Integration tests for the chat HTTP endpoint.
//!
//! The router is exercised through `tower::ServiceExt::oneshot`, feeding the
//! context from each response into the next request as a client would.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use clinic_assistant::adapters::http::{chat_router, ChatAppState};
use clinic_assistant::adapters::{FixedClock, MockClinicGateway, StaticCatalog};
use clinic_assistant::application::dialogue::{DialogueEngine, DialogueSettings};
use clinic_assistant::domain::foundation::Timestamp;
use clinic_assistant::domain::records::{Bill, BilledService};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(gateway: MockClinicGateway) -> Router {
    let engine = DialogueEngine::new(
        Arc::new(gateway),
        Arc::new(StaticCatalog::builtin()),
        Arc::new(FixedClock::new(Timestamp::from_unix_secs(1_736_906_400))),
        DialogueSettings::default(),
    );
    chat_router().with_state(ChatAppState::new(Arc::new(engine)))
}

async fn post_turn(app: &Router, body: Value, token: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method("POST")
        .uri("/api/chat/turns")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn full_booking_over_http() {
    let app = app(MockClinicGateway::new());
    let mut context = Value::Null;
    let mut reply = String::new();

    for message in [
        "đặt lịch khám",
        "1",
        "trần thị b",
        "20/01/2025",
        "07:30",
        "Nguyễn Văn A",
        "0912345678",
        "a@example.com",
        "đau đầu",
        "xác nhận",
    ] {
        let body = if context.is_null() {
            json!({ "message": message })
        } else {
            json!({ "message": message, "context": context })
        };
        let (status, response) = post_turn(&app, body, None).await;
        assert_eq!(status, StatusCode::OK, "turn {message:?} failed");
        reply = response["reply"].as_str().unwrap().to_string();
        context = response["context"].clone();
    }

    assert!(reply.contains("APPT-0001"));
    assert_eq!(context["flow"]["state"], "idle");
    assert_eq!(context["resultReference"], "APPT-0001");
}

#[tokio::test]
async fn context_round_trips_unchanged_apart_from_timestamp() {
    let app = app(MockClinicGateway::new());
    let (_, first) = post_turn(&app, json!({ "message": "đặt lịch khám" }), None).await;

    let (_, second) = post_turn(
        &app,
        json!({ "message": "xin lỗi, gì cơ?", "context": first["context"] }),
        None,
    )
    .await;

    let mut before = first["context"].clone();
    let mut after = second["context"].clone();
    before.as_object_mut().unwrap().remove("updatedAt");
    after.as_object_mut().unwrap().remove("updatedAt");
    assert_eq!(before, after);
}

#[tokio::test]
async fn billing_lookup_uses_bearer_token() {
    let bill = Bill {
        visit_id: "V20250110".to_string(),
        visit_date: "2025-01-10".to_string(),
        facility_name: "Bệnh viện Chợ Rẫy".to_string(),
        services: vec![BilledService {
            service_id: None,
            service_name: "Xét nghiệm máu".to_string(),
            quantity: 2,
            unit_price: 100000.0,
            total_price: 200000.0,
        }],
        total_base_price: 200000.0,
        total_insurance_covered: 160000.0,
        total_patient_pay: 40000.0,
        insurance_type: None,
        note: None,
    };
    let app = app(MockClinicGateway::new().with_bill(bill));

    let (status, response) =
        post_turn(&app, json!({ "message": "cho tôi xem hóa đơn" }), Some("tok")).await;

    assert_eq!(status, StatusCode::OK);
    let reply = response["reply"].as_str().unwrap();
    assert!(reply.contains("Xét nghiệm máu"));
    assert!(reply.contains("40.000 ₫"));
    assert_eq!(response["context"]["flow"]["state"], "idle");
}

#[tokio::test]
async fn empty_message_is_a_bad_request() {
    let app = app(MockClinicGateway::new());

    let (status, response) = post_turn(&app, json!({ "message": "" }), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "BAD_REQUEST");
}
