//! Turn inputs and outputs shared by the flow controllers.

use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use thiserror::Error;

use crate::domain::dialogue::{prompts, ConversationContext, Flow, SlotField};
use crate::domain::foundation::{Timestamp, ValidationError};
use crate::ports::{AccessToken, GatewayError};

/// Clinic local time, UTC+7.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 7 * 60;

/// In-progress flows are dropped after ten idle minutes.
pub const DEFAULT_CONTEXT_TTL_SECS: u64 = 600;

/// Command to process one user utterance.
#[derive(Debug, Clone)]
pub struct TurnCommand {
    pub utterance: String,
    /// Context returned by the previous turn; `None` starts a conversation.
    pub context: Option<ConversationContext>,
    /// Forwarded to the gateway when present.
    pub access_token: Option<AccessToken>,
}

impl TurnCommand {
    pub fn new(utterance: impl Into<String>) -> Self {
        Self {
            utterance: utterance.into(),
            context: None,
            access_token: None,
        }
    }

    pub fn with_context(mut self, context: ConversationContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_access_token(mut self, token: AccessToken) -> Self {
        self.access_token = Some(token);
        self
    }
}

/// Reply text and the context to hand back on the next turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub reply: String,
    pub context: ConversationContext,
}

/// What a controller sees of the current turn.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'a> {
    pub utterance: &'a str,
    pub now: Timestamp,
    /// Calendar day at the clinic.
    pub today: NaiveDate,
    /// Wall-clock time at the clinic.
    pub local_time: NaiveTime,
    pub access_token: Option<&'a AccessToken>,
}

impl<'a> Turn<'a> {
    pub fn new(
        utterance: &'a str,
        now: Timestamp,
        offset: FixedOffset,
        access_token: Option<&'a AccessToken>,
    ) -> Self {
        let local = now.local_datetime(offset);
        Self {
            utterance,
            now,
            today: local.date(),
            local_time: local.time(),
            access_token,
        }
    }
}

/// How a controller is entered on this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// The flow was just started by this utterance.
    Fresh,
    /// The flow was already active; the utterance answers its pending field.
    Resume,
}

/// Engine-wide dialogue settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogueSettings {
    pub context_ttl: Duration,
    pub utc_offset: FixedOffset,
}

impl DialogueSettings {
    pub fn new(context_ttl_secs: u64, utc_offset_minutes: i32) -> Result<Self, ValidationError> {
        let utc_offset = FixedOffset::east_opt(utc_offset_minutes * 60).ok_or_else(|| {
            ValidationError::out_of_range("utc_offset_minutes", -720, 840, utc_offset_minutes as i64)
        })?;
        Ok(Self {
            context_ttl: Duration::seconds(context_ttl_secs as i64),
            utc_offset,
        })
    }
}

impl Default for DialogueSettings {
    fn default() -> Self {
        Self {
            context_ttl: Duration::seconds(DEFAULT_CONTEXT_TTL_SECS as i64),
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_MINUTES * 60)
                .unwrap_or_else(|| Utc.fix()),
        }
    }
}

/// Unexpected failures inside a turn.
///
/// The engine answers any of these with the help menu and an idle context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DialogueError {
    #[error("Required field '{0}' is missing from the context")]
    MissingField(SlotField),

    #[error("Stored value for '{0}' is malformed")]
    MalformedField(SlotField),

    #[error("Field '{0}' is not collected by this flow")]
    UnexpectedField(SlotField),

    #[error("Catalog has no entry '{0}'")]
    UnknownCatalogEntry(String),

    #[error("Controller invoked in state {0:?}")]
    FlowMismatch(Flow),

    #[error("Invalid step transition: {0}")]
    InvalidTransition(#[from] ValidationError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Value of a collected field that must be present.
pub(super) fn required(
    context: &ConversationContext,
    field: SlotField,
) -> Result<String, DialogueError> {
    context
        .collected
        .value(field)
        .map(str::to_string)
        .ok_or(DialogueError::MissingField(field))
}

/// Reply for a failed submission the user may retry by confirming again.
pub(super) fn submission_failure(
    err: GatewayError,
    rejected: impl FnOnce(&str) -> String,
) -> Result<String, DialogueError> {
    match err {
        GatewayError::Timeout { .. } => Ok(prompts::timed_out_with_retry()),
        GatewayError::Unauthorized => Ok(prompts::sign_in_required()),
        GatewayError::Rejected { message, .. } | GatewayError::NotFound { message } => {
            Ok(rejected(&message))
        }
        GatewayError::Connectivity(_) => Ok(prompts::unreachable_with_retry()),
        err @ GatewayError::Decode(_) => Err(err.into()),
    }
}
