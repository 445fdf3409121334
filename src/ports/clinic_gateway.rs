//! Clinic Gateway Port - Interface to the booking, queue and billing services.
//!
//! Flow controllers own a gateway and call it once every required field of a
//! flow is valid. Implementations attach the caller's access token when one is
//! present, bound every call with a timeout and never retry on their own.
//!
//! # Example
//!
//! ```ignore
//! let ticket = gateway
//!     .queue_check_in(&request, token.as_ref())
//!     .await?;
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use std::fmt;

use crate::domain::records::{
    Appointment, AppointmentRequest, Bill, CheckInRequest, QueueType, Ticket,
};

/// Bearer token forwarded to the clinic services on behalf of the user.
#[derive(Clone)]
pub struct AccessToken(Secret<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Secret::new(token.into()))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Port for the clinic's external HTTP services.
#[async_trait]
pub trait ClinicGateway: Send + Sync {
    /// Books an appointment; the result starts out `pending`.
    async fn create_appointment(
        &self,
        request: &AppointmentRequest,
        token: Option<&AccessToken>,
    ) -> Result<Appointment, GatewayError>;

    /// Appointments belonging to the signed-in user.
    async fn list_appointments(
        &self,
        token: Option<&AccessToken>,
    ) -> Result<Vec<Appointment>, GatewayError>;

    async fn queue_check_in(
        &self,
        request: &CheckInRequest,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError>;

    /// Current snapshot of the caller's ticket in the given queue.
    async fn queue_status(
        &self,
        queue_type: QueueType,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError>;

    /// Issues a replacement ticket, superseding the previous one.
    async fn queue_reissue(
        &self,
        queue_type: QueueType,
        token: Option<&AccessToken>,
    ) -> Result<Ticket, GatewayError>;

    /// Most recent bill for the signed-in user.
    async fn latest_bill(&self, token: Option<&AccessToken>) -> Result<Bill, GatewayError>;
}

/// Errors from clinic gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The call exceeded its time bound and was abandoned.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured bound.
        timeout_secs: u64,
    },

    /// The service answered with a structured failure.
    #[error("rejected with status {status}: {message}")]
    Rejected {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// Missing or invalid credentials.
    #[error("authentication required")]
    Unauthorized,

    /// The requested record does not exist.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Transport-level failure (DNS, refused connection, reset).
    #[error("connectivity error: {0}")]
    Connectivity(String),

    /// The service answered 2xx but the body was not understood.
    #[error("decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    pub fn rejected(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::Connectivity(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Failures the user can act on by retrying the same submission.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, GatewayError::Decode(_))
    }

    /// Short machine-readable kind for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Timeout { .. } => "timeout",
            GatewayError::Rejected { .. } => "rejected",
            GatewayError::Unauthorized => "unauthorized",
            GatewayError::NotFound { .. } => "not_found",
            GatewayError::Connectivity(_) => "connectivity",
            GatewayError::Decode(_) => "decode",
        }
    }
}
