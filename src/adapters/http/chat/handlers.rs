//! Axum handlers for the chat endpoint.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::dto::{ChatTurnRequest, ChatTurnResponse, ErrorResponse};
use crate::application::dialogue::{DialogueEngine, TurnCommand};
use crate::ports::AccessToken;

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ChatAppState {
    pub engine: Arc<DialogueEngine>,
}

impl ChatAppState {
    pub fn new(engine: Arc<DialogueEngine>) -> Self {
        Self { engine }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Extractors
// ════════════════════════════════════════════════════════════════════════════════

/// Bearer token from the `Authorization` header, if the user is signed in.
///
/// A missing or malformed header is not an error: booking and queue flows
/// work anonymously, lookups answer with a sign-in prompt.
#[derive(Debug, Default)]
pub struct BearerToken(pub Option<AccessToken>);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(AccessToken::new);

        Ok(BearerToken(token))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat/turns - Process one user message
pub async fn post_turn(
    State(state): State<ChatAppState>,
    BearerToken(token): BearerToken,
    Json(request): Json<ChatTurnRequest>,
) -> Result<impl IntoResponse, ChatApiError> {
    if request.message.trim().is_empty() {
        return Err(ChatApiError::BadRequest(
            "message must not be empty".to_string(),
        ));
    }

    let mut command = TurnCommand::new(request.message);
    if let Some(context) = request.context {
        command = command.with_context(context);
    }
    if let Some(token) = token {
        command = command.with_access_token(token);
    }

    let result = state.engine.handle(command).await;

    Ok(Json(ChatTurnResponse {
        reply: result.reply,
        context: result.context,
    }))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum ChatApiError {
    BadRequest(String),
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ChatApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
        };

        (status, Json(error)).into_response()
    }
}
