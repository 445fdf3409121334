//! Route configuration for the chat endpoint.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{health, post_turn, ChatAppState};

/// Creates the chat router.
///
/// Routes:
/// - `POST /api/chat/turns` - Process one message, return reply and context
/// - `GET /health` - Liveness check
pub fn chat_router() -> Router<ChatAppState> {
    Router::new()
        .route("/api/chat/turns", post(post_turn))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::catalog::StaticCatalog;
    use crate::adapters::clock::FixedClock;
    use crate::adapters::gateway::{GatewayCall, MockClinicGateway};
    use crate::application::dialogue::{DialogueEngine, DialogueSettings};
    use crate::domain::dialogue::{prompts, FlowKind};
    use crate::domain::foundation::Timestamp;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    use super::super::dto::ChatTurnResponse;

    // ───────────────────────────────────────────────────────────────
    // Test fixtures
    // ───────────────────────────────────────────────────────────────

    fn app(gateway: MockClinicGateway) -> Router {
        let engine = DialogueEngine::new(
            Arc::new(gateway),
            Arc::new(StaticCatalog::builtin()),
            Arc::new(FixedClock::new(Timestamp::from_unix_secs(1_736_906_400))),
            DialogueSettings::default(),
        );
        chat_router().with_state(ChatAppState::new(Arc::new(engine)))
    }

    fn turn_request(body: serde_json::Value, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/chat/turns")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn read_turn(response: axum::response::Response) -> ChatTurnResponse {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // Tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app(MockClinicGateway::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn first_turn_starts_booking() {
        let response = app(MockClinicGateway::new())
            .oneshot(turn_request(
                serde_json::json!({ "message": "đặt lịch khám" }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_turn(response).await;
        assert!(body.reply.contains("Vui lòng chọn bệnh viện"));
        assert_eq!(body.context.active_flow(), Some(FlowKind::Appointment));
    }

    #[tokio::test]
    async fn returned_context_drives_next_turn() {
        let first = read_turn(
            app(MockClinicGateway::new())
                .oneshot(turn_request(
                    serde_json::json!({ "message": "đặt lịch khám" }),
                    None,
                ))
                .await
                .unwrap(),
        )
        .await;

        let response = app(MockClinicGateway::new())
            .oneshot(turn_request(
                serde_json::json!({ "message": "1", "context": first.context }),
                None,
            ))
            .await
            .unwrap();

        let second = read_turn(response).await;
        assert!(second.reply.contains("BS. Nguyễn Văn A"));
        assert_eq!(second.context.conversation_id, first.context.conversation_id);
    }

    #[tokio::test]
    async fn bearer_token_reaches_gateway() {
        let gateway = MockClinicGateway::new();

        let response = app(gateway.clone())
            .oneshot(turn_request(
                serde_json::json!({ "message": "xem lịch hẹn của tôi" }),
                Some("token-123"),
            ))
            .await
            .unwrap();

        let body = read_turn(response).await;
        assert_eq!(body.reply, prompts::no_appointments());
        assert_eq!(
            gateway.get_calls(),
            vec![GatewayCall::ListAppointments { authenticated: true }]
        );
        assert!(body.context.is_idle());
    }

    #[tokio::test]
    async fn lookup_without_token_asks_to_sign_in() {
        let gateway = MockClinicGateway::new();

        let response = app(gateway.clone())
            .oneshot(turn_request(
                serde_json::json!({ "message": "xem lịch hẹn của tôi" }),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(read_turn(response).await.reply, prompts::sign_in_required());
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let response = app(MockClinicGateway::new())
            .oneshot(turn_request(serde_json::json!({ "message": "  " }), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(error["code"], "BAD_REQUEST");
    }
}
