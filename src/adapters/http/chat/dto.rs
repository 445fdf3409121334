//! Request and response bodies for the chat endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::dialogue::ConversationContext;

/// Body of `POST /api/chat/turns`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurnRequest {
    pub message: String,
    /// Context returned by the previous turn; omitted on the first turn.
    #[serde(default)]
    pub context: Option<ConversationContext>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurnResponse {
    pub reply: String,
    pub context: ConversationContext,
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}
